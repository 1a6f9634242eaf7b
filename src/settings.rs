use crate::sampler::DirectionSampler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Four relative weights, ordered up/top, right, down/bottom, left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(pub [u32; 4]);

impl Weights {
    /// Equal chance for every direction
    pub const UNIFORM: Weights = Weights([25, 25, 25, 25]);

    pub fn sum(&self) -> u64 {
        self.0.iter().map(|&w| w as u64).sum()
    }

    pub fn as_array(&self) -> [u32; 4] {
        self.0
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::UNIFORM
    }
}

impl FromStr for Weights {
    type Err = String;

    /// Parse a comma-separated list such as `"40,20,20,20"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items: Vec<&str> = s.split(',').map(str::trim).collect();
        if items.len() < 4 {
            return Err(format!(
                "list too short, should be 4 comma separated (got {})",
                items.len()
            ));
        }
        if items.len() > 4 {
            return Err(format!(
                "list too long, should be 4 comma separated (got {})",
                items.len()
            ));
        }

        let mut weights = [0u32; 4];
        for (slot, item) in weights.iter_mut().zip(&items) {
            *slot = item
                .parse()
                .map_err(|_| format!("list does not contain regular integers: {:?}", item))?;
        }
        Ok(Weights(weights))
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{},{},{},{}", a, b, c, d)
    }
}

/// Lattice edge a new particle enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Order matching the start weights
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn name(&self) -> &str {
        match self {
            Side::Top => "Top",
            Side::Right => "Right",
            Side::Bottom => "Bottom",
            Side::Left => "Left",
        }
    }
}

/// One-cell lattice step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Order matching the move weights
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn name(&self) -> &str {
        match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        }
    }

    /// Offset in lattice coordinates (y grows downward)
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Diffusion behaviour shared read-only by every particle
#[derive(Debug, Clone)]
pub struct DiffuseConfig {
    start: Weights,
    moves: Weights,
    start_sampler: DirectionSampler,
    move_sampler: DirectionSampler,
}

impl DiffuseConfig {
    pub fn new(start: Weights, moves: Weights) -> Self {
        Self {
            start,
            moves,
            start_sampler: DirectionSampler::new(start.as_array()),
            move_sampler: DirectionSampler::new(moves.as_array()),
        }
    }

    pub fn start(&self) -> Weights {
        self.start
    }

    pub fn moves(&self) -> Weights {
        self.moves
    }

    /// Sampler for the entry side, driven by the start weights
    pub fn start_sampler(&self) -> &DirectionSampler {
        &self.start_sampler
    }

    /// Sampler for each step, driven by the move weights
    pub fn move_sampler(&self) -> &DirectionSampler {
        &self.move_sampler
    }
}

impl Default for DiffuseConfig {
    fn default() -> Self {
        Self::new(Weights::UNIFORM, Weights::UNIFORM)
    }
}
