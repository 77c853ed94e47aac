pub mod generator;

use std::fmt;

/// One grid position, row-major from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open,
    Blocked,
    Start,
    Destination,
}

/// An `n x n` maze with the start fixed at the top-left corner and the
/// destination at the bottom-right. Immutable once built; one grid backs
/// exactly one run at a time.
#[derive(Clone)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Grid {
        let size = cells.len();
        debug_assert!(size >= 2, "grid must be at least 2x2");
        debug_assert!(
            cells.iter().all(|row| row.len() == size),
            "grid must be square"
        );
        debug_assert!(cells[0][0] == Cell::Start, "start must be at (0, 0)");
        debug_assert!(
            cells[size - 1][size - 1] == Cell::Destination,
            "destination must be at (n-1, n-1)"
        );

        Grid { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.row][coord.col]
    }

    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn destination(&self) -> Coord {
        let n = self.size();
        Coord::new(n - 1, n - 1)
    }

    pub fn contains(&self, row: isize, col: isize) -> bool {
        let n = self.size() as isize;
        row >= 0 && row < n && col >= 0 && col < n
    }

    pub fn is_open(&self, coord: Coord) -> bool {
        self.cell(coord) != Cell::Blocked
    }

    pub fn blocked_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Blocked)
            .count()
    }

    pub fn log(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| match cell {
                        Cell::Open => "  ",
                        Cell::Blocked => "██",
                        Cell::Start => "S ",
                        Cell::Destination => "D ",
                    })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(n: usize) -> Grid {
        let mut cells = vec![vec![Cell::Open; n]; n];
        cells[0][0] = Cell::Start;
        cells[n - 1][n - 1] = Cell::Destination;
        Grid::from_cells(cells)
    }

    #[test]
    fn start_and_destination_are_at_the_corners() {
        let grid = open_grid(4);
        assert_eq!(grid.start(), Coord::new(0, 0));
        assert_eq!(grid.destination(), Coord::new(3, 3));
        assert_eq!(grid.cell(grid.start()), Cell::Start);
        assert_eq!(grid.cell(grid.destination()), Cell::Destination);
    }

    #[test]
    fn contains_rejects_out_of_bounds_coordinates() {
        let grid = open_grid(3);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(2, 2));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(0, 3));
        assert!(!grid.contains(3, 0));
    }

    #[test]
    fn is_open_treats_everything_but_blocks_as_passable() {
        let mut cells = vec![vec![Cell::Open; 3]; 3];
        cells[0][0] = Cell::Start;
        cells[2][2] = Cell::Destination;
        cells[1][1] = Cell::Blocked;
        let grid = Grid::from_cells(cells);

        assert!(grid.is_open(Coord::new(0, 0)));
        assert!(grid.is_open(Coord::new(2, 2)));
        assert!(grid.is_open(Coord::new(0, 1)));
        assert!(!grid.is_open(Coord::new(1, 1)));
        assert_eq!(grid.blocked_count(), 1);
    }

    #[test]
    fn log_draws_one_line_per_row() {
        let grid = open_grid(3);
        let drawn = grid.log();
        assert_eq!(drawn.lines().count(), 3);
        assert!(drawn.starts_with("S "));
        assert!(drawn.ends_with("D "));
    }
}
