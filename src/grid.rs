use std::sync::{Mutex, MutexGuard, PoisonError};

/// Occupancy of a single lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied,
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Occupied)
    }
}

/// Everything guarded by the grid lock
#[derive(Debug)]
struct Lattice {
    cells: Vec<Cell>,
    finished: bool,
    /// Every placement in lock order, duplicates included
    placements: Vec<(usize, usize)>,
}

/// Shared aggregate state.
///
/// One mutex guards the cells, the terminal flag and the placement history.
/// Every operation takes the lock once, so a read followed by a place is
/// two separate critical sections and concurrent workers may race between
/// them. Both outcomes of that race leave a valid aggregate.
#[derive(Debug)]
pub struct Grid {
    size_x: usize,
    size_y: usize,
    lattice: Mutex<Lattice>,
}

impl Grid {
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Self {
            size_x,
            size_y,
            lattice: Mutex::new(Lattice {
                cells: vec![Cell::Empty; size_x * size_y],
                finished: false,
                placements: Vec::new(),
            }),
        }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Get the center coordinates of the grid
    pub fn center(&self) -> (usize, usize) {
        (self.size_x / 2, self.size_y / 2)
    }

    pub fn is_boundary(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.size_x - 1 || y == self.size_y - 1
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.size_x + x
    }

    // The lattice stays consistent even if a holder panicked: cells only go
    // Empty -> Occupied and the flag only false -> true.
    fn lock(&self) -> MutexGuard<'_, Lattice> {
        self.lattice.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a cell together with the terminal flag from the same critical section
    pub fn read_cell(&self, x: usize, y: usize) -> (Cell, bool) {
        let idx = self.index(x, y);
        let lattice = self.lock();
        (lattice.cells[idx], lattice.finished)
    }

    /// Set a cell directly, bypassing the boundary check. Used for seeding.
    /// An occupied cell is never cleared.
    pub fn write_cell(&self, x: usize, y: usize, value: Cell) {
        let idx = self.index(x, y);
        let mut lattice = self.lock();
        match (lattice.cells[idx], value) {
            (Cell::Occupied, Cell::Empty) => {
                log::warn!("refusing to clear occupied cell ({}, {})", x, y);
            }
            (Cell::Empty, Cell::Occupied) => {
                lattice.cells[idx] = Cell::Occupied;
                lattice.placements.push((x, y));
            }
            _ => {}
        }
    }

    /// Occupy the single center cell the aggregate grows from
    pub fn seed_center(&self) {
        let (cx, cy) = self.center();
        self.write_cell(cx, cy, Cell::Occupied);
    }

    /// Stick a particle at `(x, y)`. Landing on the lattice boundary ends the run.
    /// Placing an already occupied cell changes nothing but the history.
    pub fn place(&self, x: usize, y: usize) {
        let idx = self.index(x, y);
        let boundary = self.is_boundary(x, y);
        let mut lattice = self.lock();
        lattice.cells[idx] = Cell::Occupied;
        lattice.placements.push((x, y));
        if boundary {
            lattice.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    /// Number of occupied cells, seed included
    pub fn particles_stuck(&self) -> usize {
        self.lock().cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Reclaim the lattice once no worker holds a reference
    pub fn into_snapshot(self) -> Snapshot {
        let lattice = self
            .lattice
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            size_x: self.size_x,
            size_y: self.size_y,
            cells: lattice.cells,
            finished: lattice.finished,
            placements: lattice.placements,
        }
    }
}

/// Settled lattice handed to rendering and reporting
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub size_x: usize,
    pub size_y: usize,
    pub cells: Vec<Cell>,
    pub finished: bool,
    /// Seed first, then every stick in the order it took the lock
    pub placements: Vec<(usize, usize)>,
}

impl Snapshot {
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.size_x && y < self.size_y {
            Some(self.cells[y * self.size_x + x])
        } else {
            None
        }
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|c| c.is_occupied())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.particles_stuck(), 0);
        assert!(!grid.is_finished());
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.read_cell(x, y), (Cell::Empty, false));
            }
        }
    }

    #[test]
    fn test_seed_center_uses_integer_division() {
        let grid = Grid::new(7, 4);
        grid.seed_center();
        assert_eq!(grid.read_cell(3, 2).0, Cell::Occupied);
        assert_eq!(grid.particles_stuck(), 1);
        // Seeding never terminates the run
        assert!(!grid.is_finished());

        let snapshot = grid.into_snapshot();
        assert_eq!(snapshot.placements, vec![(3, 2)]);
    }

    #[test]
    fn test_place_interior_does_not_finish() {
        let grid = Grid::new(5, 5);
        grid.place(2, 3);
        assert_eq!(grid.read_cell(2, 3), (Cell::Occupied, false));
        assert!(!grid.is_finished());
    }

    #[test]
    fn test_place_on_each_boundary_finishes() {
        for (x, y) in [(0, 2), (4, 2), (2, 0), (2, 4), (0, 0), (4, 4)] {
            let grid = Grid::new(5, 5);
            grid.place(x, y);
            assert!(grid.is_finished(), "({}, {}) is a boundary cell", x, y);
            assert_eq!(grid.read_cell(1, 1), (Cell::Empty, true));
        }
    }

    #[test]
    fn test_write_cell_never_finishes() {
        let grid = Grid::new(5, 5);
        grid.write_cell(0, 0, Cell::Occupied);
        assert_eq!(grid.read_cell(0, 0), (Cell::Occupied, false));
    }

    #[test]
    fn test_place_is_idempotent() {
        let once = Grid::new(6, 6);
        once.place(2, 2);

        let twice = Grid::new(6, 6);
        twice.place(2, 2);
        twice.place(2, 2);

        assert_eq!(twice.particles_stuck(), once.particles_stuck());
        assert!(!twice.is_finished());

        let once = once.into_snapshot();
        let twice = twice.into_snapshot();
        assert_eq!(once.cells, twice.cells);
        assert_eq!(once.finished, twice.finished);
        assert_eq!(twice.placements.len(), 2);
    }

    #[test]
    fn test_stuck_count_matches_snapshot() {
        let grid = Grid::new(8, 8);
        grid.seed_center();
        grid.place(3, 4);
        grid.place(3, 4);
        grid.place(2, 4);
        assert_eq!(grid.particles_stuck(), 3);

        let snapshot = grid.into_snapshot();
        assert_eq!(snapshot.occupied_count(), 3);
        assert_eq!(snapshot.placements.len(), 4);
    }

    #[test]
    fn test_occupied_cell_is_never_cleared() {
        let grid = Grid::new(3, 3);
        grid.place(1, 1);
        grid.write_cell(1, 1, Cell::Empty);
        assert_eq!(grid.read_cell(1, 1).0, Cell::Occupied);
        assert_eq!(grid.particles_stuck(), 1);
    }

    #[test]
    fn test_non_square_indexing() {
        let grid = Grid::new(6, 2);
        grid.place(5, 1);
        let snapshot = grid.into_snapshot();
        assert!(snapshot.is_occupied(5, 1));
        assert!(!snapshot.is_occupied(1, 5));
        assert_eq!(snapshot.get(6, 0), None);
        assert_eq!(snapshot.occupied_count(), 1);
    }

    #[test]
    fn test_concurrent_places_all_land() {
        let grid = Grid::new(32, 32);
        std::thread::scope(|s| {
            for t in 0..4 {
                let grid = &grid;
                s.spawn(move || {
                    for x in 1..31 {
                        grid.place(x, 1 + t);
                        // Every worker also hits a shared row
                        grid.place(x, 10);
                    }
                });
            }
        });
        assert!(!grid.is_finished());
        assert_eq!(grid.particles_stuck(), 30 * 5);
        assert_eq!(grid.into_snapshot().placements.len(), 30 * 8);
    }
}
