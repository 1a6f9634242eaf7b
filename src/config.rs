use crate::settings::{DiffuseConfig, Weights};
use crate::simulation::DlaSimulation;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to start a run, as loaded from or saved to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Lattice width in cells
    pub size_x: usize,
    /// Lattice height in cells
    pub size_y: usize,
    /// Entry side weights: top, right, bottom, left
    pub start: Weights,
    /// Step weights: up, right, down, left
    #[serde(rename = "move")]
    pub moves: Weights,
    /// Number of concurrent walkers
    pub workers: usize,
    /// Base seed for the worker generators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size_x: 200,
            size_y: 200,
            start: Weights::UNIFORM,
            moves: Weights::UNIFORM,
            workers: DlaSimulation::DEFAULT_WORKERS,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Check the invariants the simulation core assumes
    pub fn validate(&self) -> Result<()> {
        if self.size_x == 0 || self.size_y == 0 {
            bail!(
                "lattice dimensions must be positive (got {}x{})",
                self.size_x,
                self.size_y
            );
        }
        if self.workers == 0 {
            bail!("at least one worker is required");
        }
        if self.moves.sum() != 100 {
            bail!(
                "'move' list does not add up to 100 (adds up to {})",
                self.moves.sum()
            );
        }
        if self.start.sum() != 100 {
            bail!(
                "'start' list does not add up to 100 (adds up to {})",
                self.start.sum()
            );
        }
        Ok(())
    }

    pub fn diffuse_config(&self) -> DiffuseConfig {
        DiffuseConfig::new(self.start, self.moves)
    }

    /// Build the simulation this config describes
    pub fn simulation(&self) -> DlaSimulation {
        let sim = DlaSimulation::new(self.size_x, self.size_y, self.diffuse_config())
            .with_workers(self.workers);
        match self.seed {
            Some(seed) => sim.with_seed(seed),
            None => sim,
        }
    }
}
