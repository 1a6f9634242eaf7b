//! Diffusion-Limited Aggregation on a bounded lattice.
//!
//! Particles enter at random edge cells, take weighted random steps and
//! stick to the aggregate the first time they try to step onto an occupied
//! cell. A fixed pool of worker threads walks particles against one shared
//! [`Grid`] until some particle sticks on the lattice boundary.

pub mod config;
pub mod export;
pub mod grid;
pub mod particle;
pub mod report;
pub mod sampler;
pub mod settings;
pub mod simulation;

pub use grid::{Cell, Grid, Snapshot};
pub use particle::Particle;
pub use settings::{DiffuseConfig, Direction, Side, Weights};
pub use simulation::{DlaSimulation, Outcome, WorkerReport};
