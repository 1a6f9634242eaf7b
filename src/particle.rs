use crate::grid::Grid;
use crate::settings::{DiffuseConfig, Direction, Side};
use rand::Rng;

/// A single walker. One instance lives per worker and is recycled with
/// [`Particle::initialize`] every time it sticks.
#[derive(Debug, Clone)]
pub struct Particle<'a> {
    x: usize,
    y: usize,
    last_x: usize,
    last_y: usize,
    config: &'a DiffuseConfig,
}

impl<'a> Particle<'a> {
    /// Create a particle placed on a random edge of the grid
    pub fn new<R: Rng + ?Sized>(config: &'a DiffuseConfig, grid: &Grid, rng: &mut R) -> Self {
        let mut particle = Self {
            x: 0,
            y: 0,
            last_x: 0,
            last_y: 0,
            config,
        };
        particle.initialize(grid, rng);
        particle
    }

    /// Create a particle at a fixed position
    pub fn at(config: &'a DiffuseConfig, x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            last_x: x,
            last_y: y,
            config,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn last_position(&self) -> (usize, usize) {
        (self.last_x, self.last_y)
    }

    /// Reset onto a random edge cell. The side comes from the start weights,
    /// the coordinate along it is uniform.
    pub fn initialize<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        let (size_x, size_y) = (grid.size_x(), grid.size_y());
        let side = self.config.start_sampler().pick(rng, &Side::ALL);

        (self.x, self.y) = match side {
            Side::Top => (rng.gen_range(0..size_x), 0),
            Side::Right => (size_x - 1, rng.gen_range(0..size_y)),
            Side::Bottom => (rng.gen_range(0..size_x), size_y - 1),
            Side::Left => (0, rng.gen_range(0..size_y)),
        };
        self.last_x = self.x;
        self.last_y = self.y;
    }

    /// Take one weighted step. A step that would leave the lattice is
    /// dropped and leaves both the position and the last position as they
    /// were. Returns whether the particle moved.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> bool {
        let direction = self.config.move_sampler().pick(rng, &Direction::ALL);
        let (dx, dy) = direction.offset();
        let nx = self.x as i64 + dx;
        let ny = self.y as i64 + dy;

        if nx < 0 || ny < 0 || nx >= grid.size_x() as i64 || ny >= grid.size_y() as i64 {
            return false;
        }

        self.last_x = self.x;
        self.last_y = self.y;
        self.x = nx as usize;
        self.y = ny as usize;
        true
    }

    /// Move back to the cell held before the most recent successful step
    pub fn revert(&mut self) {
        self.x = self.last_x;
        self.y = self.last_y;
    }
}
