use crate::config::RunConfig;
use crate::simulation::Outcome;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTime {
    #[serde(rename = "SECONDS")]
    pub seconds: f64,
    #[serde(rename = "MINUTES")]
    pub minutes: f64,
}

impl From<Duration> for RunTime {
    fn from(elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        Self {
            seconds,
            minutes: seconds / 60.0,
        }
    }
}

/// One line of the run log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RunRecord {
    pub size: [usize; 2],
    #[serde(rename = "MOVE")]
    pub moves: String,
    pub start: String,
    pub workers: usize,
    /// Occupied cells at the end, seed included
    pub stuck: usize,
    pub time: RunTime,
}

impl RunRecord {
    pub fn new(config: &RunConfig, outcome: &Outcome) -> Self {
        Self {
            size: [config.size_x, config.size_y],
            moves: config.moves.to_string(),
            start: config.start.to_string(),
            workers: outcome.workers.len(),
            stuck: outcome.snapshot.occupied_count(),
            time: outcome.elapsed.into(),
        }
    }
}

/// Append-only JSON-lines file recording every completed run
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open run log '{}'", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, record: &RunRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("Failed to serialize run record")?;
        writeln!(self.file, "{}", line)
            .with_context(|| format!("Failed to write run log '{}'", self.path.display()))?;
        Ok(())
    }
}
