use rand::Rng;

use crate::grid::{Cell, Grid};

pub const MIN_SIZE: usize = 2;

/// Sanitized maze configuration. Out-of-range requests are clamped here,
/// before a grid is ever built, so the generator and solver never see an
/// invalid combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeSpec {
    size: usize,
    block_count: usize,
}

impl MazeSpec {
    pub fn new(size: usize, block_count: usize) -> MazeSpec {
        let size = size.max(MIN_SIZE);
        let block_count = block_count.min(Self::max_blocks(size));
        MazeSpec { size, block_count }
    }

    /// Every cell can be blocked except start and destination.
    pub fn max_blocks(size: usize) -> usize {
        size * size - 2
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn with_size(&self, size: usize) -> MazeSpec {
        MazeSpec::new(size, self.block_count)
    }

    pub fn with_block_count(&self, block_count: usize) -> MazeSpec {
        MazeSpec::new(self.size, block_count)
    }
}

/// Builds a grid with `spec.block_count()` blocks placed uniformly at
/// random. The start and destination corners always stay open. There is no
/// reachability guarantee: a run over the result may end exhausted.
pub fn generate(spec: MazeSpec, rng: &mut impl Rng) -> Grid {
    let n = spec.size();
    let mut cells = vec![vec![Cell::Open; n]; n];

    for _ in 0..spec.block_count() {
        // Rejection sampling: redraw until we hit an open cell that is
        // neither corner. Capped by `max_blocks`, this always terminates.
        loop {
            let row = rng.random_range(0..n);
            let col = rng.random_range(0..n);

            let is_corner = (row == 0 && col == 0) || (row == n - 1 && col == n - 1);
            if is_corner || cells[row][col] == Cell::Blocked {
                continue;
            }

            cells[row][col] = Cell::Blocked;
            break;
        }
    }

    cells[0][0] = Cell::Start;
    cells[n - 1][n - 1] = Cell::Destination;

    Grid::from_cells(cells)
}
