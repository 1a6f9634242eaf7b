use anyhow::{bail, Context, Result};
use clap::Parser;
use dla_aggregation::config::RunConfig;
use dla_aggregation::export;
use dla_aggregation::report::{RunLog, RunRecord};
use dla_aggregation::Weights;
use log::{error, info};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dla-aggregation", version)]
#[command(about = "Diffusion Limited Aggregation")]
struct Args {
    /// Lattice width in cells
    x_size: Option<usize>,

    /// Lattice height in cells
    y_size: Option<usize>,

    /// Output image filename (must end in .png)
    #[arg(short = 'o', long, default_value = "DLA.out.png")]
    output: PathBuf,

    /// Movement weights, sum must be 100: "up,right,down,left"
    #[arg(short = 'm', long = "move")]
    moves: Option<Weights>,

    /// Entry side weights, sum must be 100: "top,right,bottom,left"
    #[arg(short = 's', long)]
    start: Option<Weights>,

    /// Print the worker name every time one of its particles sticks
    #[arg(short = 'r', long, visible_alias = "report")]
    verbose: bool,

    /// Do not write the resulting image
    #[arg(short = 'n', long = "nooutput")]
    no_output: bool,

    /// Number of concurrent walkers (default 10)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Base seed for the walkers' random generators
    #[arg(long)]
    seed: Option<u64>,

    /// Load run settings from a JSON file; other arguments override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective run settings to a JSON file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Operations log, appended to
    #[arg(long = "log-file", default_value = "DLA.log")]
    log_file: PathBuf,

    /// JSON-lines record of completed runs, appended to
    #[arg(long = "run-log", default_value = "DLArun.log")]
    run_log: PathBuf,
}

/// Merge the config file (if any) with the command line and validate the result
fn build_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load_from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load run settings from '{}'", path.display()))?,
        None => RunConfig::default(),
    };

    match (args.x_size, args.y_size) {
        (Some(x), Some(y)) => {
            config.size_x = x;
            config.size_y = y;
        }
        (None, None) if args.config.is_some() => {}
        _ => bail!("Supply two arguments: <X_SIZE> <Y_SIZE> (+options)"),
    }

    if let Some(moves) = args.moves {
        config.moves = moves;
    }
    if let Some(start) = args.start {
        config.start = start;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.output.extension().and_then(|e| e.to_str()) != Some("png") {
        bail!("'output' filename must end \".png\"");
    }

    config.validate()?;
    Ok(config)
}

fn save_run_settings(config: &RunConfig, path: &Path) -> Result<()> {
    config
        .save_to_file(path)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Failed to save run settings to '{}'", path.display()))
}

/// Echo a worker name as soon as its particle sticks
fn report_stick<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    write!(out, "{} ", name)?;
    out.flush()
}

/// Route the `log` facade into the operations log file
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_file)?;
    info!("Starting");

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to validate args: {:#}", e);
            return Err(e);
        }
    };

    if let Some(path) = &args.save_config {
        save_run_settings(&config, path)?;
        info!("Saved run settings to {}", path.display());
    }

    let mut run_log = RunLog::open(&args.run_log)?;

    println!("Starting");
    let verbose = args.verbose;
    let on_stick = move |name: &str, _cell: (usize, usize)| {
        if verbose {
            // A closed stdout does not stop the run
            let _ = report_stick(&mut io::stdout().lock(), name);
        }
    };
    let outcome = config.simulation().run(&on_stick);
    println!();

    // Elapsed time is measured before export
    let record = RunRecord::new(&config, &outcome);
    let minutes = record.time.minutes;

    if args.no_output {
        println!("Done, image not exported");
        info!(
            "Complete. Took {} minutes. Result with s{} and m{} was not exported",
            minutes, config.start, config.moves
        );
    } else {
        match export::save_png(&outcome.snapshot, &args.output) {
            Ok(()) => {
                println!("Done, exported to {}", args.output.display());
                info!(
                    "Complete. Took {} minutes. Exported result with s{} and m{} to {}",
                    minutes,
                    config.start,
                    config.moves,
                    args.output.display()
                );
            }
            Err(e) => {
                println!("Done. Failed to export to image file {}", args.output.display());
                error!("{:#}. Done (took {} minutes)", e, minutes);
            }
        }
    }

    run_log.append(&record)?;
    info!("Run recorded in {}", run_log.path().display());
    Ok(())
}
