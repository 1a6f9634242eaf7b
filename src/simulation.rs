use crate::grid::{Grid, Snapshot};
use crate::particle::Particle;
use crate::settings::DiffuseConfig;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::{Duration, Instant};

/// Hook called after every stick with the worker name and the placed cell
pub type StickObserver<'o> = &'o (dyn Fn(&str, (usize, usize)) + Sync);

const WORKER_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Letters for the first 26 workers, numbers after that
fn worker_name(index: usize) -> String {
    match WORKER_LETTERS.get(index) {
        Some(&letter) => (letter as char).to_string(),
        None => index.to_string(),
    }
}

/// What one worker did before it saw the terminal flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub name: String,
    pub steps: u64,
    pub sticks: u64,
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct Outcome {
    pub snapshot: Snapshot,
    /// Wall-clock time from seeding until every worker joined
    pub elapsed: Duration,
    pub workers: Vec<WorkerReport>,
}

impl Outcome {
    pub fn total_steps(&self) -> u64 {
        self.workers.iter().map(|w| w.steps).sum()
    }

    pub fn total_sticks(&self) -> u64 {
        self.workers.iter().map(|w| w.sticks).sum()
    }
}

/// Concurrent DLA run: one shared grid, a fixed pool of walkers
pub struct DlaSimulation {
    grid: Grid,
    config: DiffuseConfig,
    workers: usize,
    seed: Option<u64>,
}

impl DlaSimulation {
    pub const DEFAULT_WORKERS: usize = 10;

    pub fn new(size_x: usize, size_y: usize, config: DiffuseConfig) -> Self {
        Self {
            grid: Grid::new(size_x, size_y),
            config,
            workers: Self::DEFAULT_WORKERS,
            seed: None,
        }
    }

    /// Set the worker count (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Seed every worker's generator. Growth order still depends on thread
    /// interleaving, so runs are not reproducible with more than one worker.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn worker_rng(seed: Option<u64>, index: usize) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Run without a stick observer
    pub fn run_quiet(self) -> Outcome {
        self.run(&|_, _| {})
    }

    /// Seed the center, run every worker until one of them sticks on the
    /// boundary, and hand back the settled lattice.
    pub fn run(self, on_stick: StickObserver<'_>) -> Outcome {
        let DlaSimulation {
            grid,
            config,
            workers,
            seed,
        } = self;

        let start = Instant::now();
        grid.seed_center();
        info!(
            "Seeded {}x{} lattice at {:?}, launching {} workers (start {}, move {})",
            grid.size_x(),
            grid.size_y(),
            grid.center(),
            workers,
            config.start(),
            config.moves()
        );

        let reports = thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|index| {
                    let grid = &grid;
                    let config = &config;
                    let name = worker_name(index);
                    let mut rng = Self::worker_rng(seed, index);
                    s.spawn(move || diffuse(grid, config, name, &mut rng, on_stick))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(report) => report,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<Vec<_>>()
        });

        let elapsed = start.elapsed();
        let snapshot = grid.into_snapshot();
        info!(
            "Aggregation finished in {:.3}s: {} cells occupied after {} placements",
            elapsed.as_secs_f64(),
            snapshot.occupied_count(),
            snapshot.placements.len()
        );

        Outcome {
            snapshot,
            elapsed,
            workers: reports,
        }
    }
}

/// Walk-and-stick loop for one worker. Only exits once the terminal flag
/// is visible.
fn diffuse<R: Rng + ?Sized>(
    grid: &Grid,
    config: &DiffuseConfig,
    name: String,
    rng: &mut R,
    on_stick: StickObserver<'_>,
) -> WorkerReport {
    let mut particle = Particle::new(config, grid, rng);
    let mut steps: u64 = 0;
    let mut sticks: u64 = 0;

    loop {
        particle.step(grid, rng);
        steps += 1;

        let (x, y) = particle.position();
        let (cell, finished) = grid.read_cell(x, y);
        if finished {
            break;
        }

        if cell.is_occupied() {
            // Stick on the last empty cell, next to the one we ran into
            particle.revert();
            let (x, y) = particle.position();
            grid.place(x, y);
            sticks += 1;
            trace!("worker {} stuck at ({}, {})", name, x, y);
            on_stick(&name, (x, y));
            particle.initialize(grid, rng);
        }
    }

    debug!("worker {} done: {} steps, {} sticks", name, steps, sticks);
    WorkerReport {
        name,
        steps,
        sticks,
    }
}
