use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

use common::{
    grid::{Cell, Coord, Grid, generator::MazeSpec},
    solve::SolveEvent,
};

use crate::controller::RunState;

/// Render model fed by step events. It keeps its own copy of the rat's
/// path, seeded with the start cell, so the rat walks forward on entries
/// and back along the same cells on backtracks.
pub struct MazeView {
    size: usize,
    blocked: Vec<Vec<bool>>,
    trail: Vec<Coord>,
}

impl MazeView {
    pub fn new(grid: &Grid) -> MazeView {
        let size = grid.size();
        let blocked = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| grid.cell(Coord::new(row, col)) == Cell::Blocked)
                    .collect()
            })
            .collect();

        MazeView {
            size,
            blocked,
            trail: vec![grid.start()],
        }
    }

    pub fn apply(&mut self, event: &SolveEvent) {
        match event {
            SolveEvent::CellEntered(coord) => self.trail.push(*coord),
            SolveEvent::CellBacktracked(coord) => {
                if self.trail.last() == Some(coord) {
                    self.trail.pop();
                }
            }
            SolveEvent::Solved(path) => self.trail = path.clone(),
            SolveEvent::Exhausted | SolveEvent::Cancelled => {}
        }
    }

    pub fn rat(&self) -> Coord {
        *self.trail.last().expect("trail always holds the start cell")
    }

    fn is_on_trail(&self, coord: Coord) -> bool {
        self.trail.contains(&coord)
    }

    /// One string per grid row, two columns per cell.
    pub fn render_lines(&self) -> Vec<String> {
        let destination = Coord::new(self.size - 1, self.size - 1);
        let rat = self.rat();

        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        let coord = Coord::new(row, col);
                        if self.blocked[row][col] {
                            "██"
                        } else if coord == rat {
                            "R "
                        } else if self.is_on_trail(coord) {
                            "· "
                        } else if coord == destination {
                            "D "
                        } else {
                            "  "
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

pub fn status_message(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "Maze generated. Press s to start.",
        RunState::Running => "Rat is moving...",
        RunState::Paused => "Paused.",
        RunState::Solved => "Rat has reached the destination!",
        RunState::Exhausted => "No solution found!",
        RunState::Cancelled => "Restarting...",
    }
}

pub struct TerminalUi<W: Write> {
    stdout: W,
    is_raw_mode_owner: bool, // True except in tests.
}

impl TerminalUi<Stdout> {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, Hide, Clear(ClearType::All))?;
        Ok(Self {
            stdout,
            is_raw_mode_owner: true,
        })
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn draw(
        &mut self,
        view: &MazeView,
        state: RunState,
        spec: MazeSpec,
        inputs_enabled: bool,
    ) -> io::Result<()> {
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;

        for line in view.render_lines() {
            queue!(self.stdout, Print(line), Print("\r\n"))?;
        }

        let lock_hint = if inputs_enabled { "" } else { " (locked)" };
        queue!(
            self.stdout,
            Print("\r\n"),
            Print(format!(
                "Size: {}  Blocks: {}{}  State: {}\r\n",
                spec.size(),
                spec.block_count(),
                lock_hint,
                state
            )),
            Print(format!("{}\r\n", status_message(state))),
            Print("s: start  p: pause/resume  r: restart  +/-: size  [/]: blocks  q: quit\r\n"),
        )?;

        self.stdout.flush()
    }
}

impl<W: Write> Drop for TerminalUi<W> {
    fn drop(&mut self) {
        if self.is_raw_mode_owner {
            execute!(self.stdout, Show, Print("\r\n")).ok();
            terminal::disable_raw_mode().expect("failed to disable raw mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_block_at(row: usize, col: usize) -> Grid {
        let mut cells = vec![vec![Cell::Open; 3]; 3];
        cells[0][0] = Cell::Start;
        cells[2][2] = Cell::Destination;
        cells[row][col] = Cell::Blocked;
        Grid::from_cells(cells)
    }

    fn setup_test_ui() -> TerminalUi<Vec<u8>> {
        TerminalUi {
            stdout: Vec::new(), // Use a simple vector as the writer.
            is_raw_mode_owner: false, // Don't touch global raw mode.
        }
    }

    #[test]
    fn fresh_view_places_the_rat_on_the_start_cell() {
        let view = MazeView::new(&grid_with_block_at(1, 1));
        assert_eq!(view.rat(), Coord::new(0, 0));

        let lines = view.render_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("R "));
        assert_eq!(lines[1], "  ██  ");
        assert!(lines[2].ends_with("D "));
    }

    #[test]
    fn entered_and_backtracked_events_walk_the_rat_forward_and_back() {
        let mut view = MazeView::new(&grid_with_block_at(1, 1));

        view.apply(&SolveEvent::CellEntered(Coord::new(1, 0)));
        assert_eq!(view.rat(), Coord::new(1, 0));
        view.apply(&SolveEvent::CellEntered(Coord::new(2, 0)));
        assert_eq!(view.rat(), Coord::new(2, 0));

        view.apply(&SolveEvent::CellBacktracked(Coord::new(2, 0)));
        assert_eq!(view.rat(), Coord::new(1, 0));
        assert!(!view.is_on_trail(Coord::new(2, 0)));

        view.apply(&SolveEvent::CellBacktracked(Coord::new(1, 0)));
        assert_eq!(view.rat(), Coord::new(0, 0));
    }

    #[test]
    fn solved_event_replaces_the_trail_with_the_full_path() {
        let mut view = MazeView::new(&grid_with_block_at(1, 1));
        let path: Vec<Coord> = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]
            .iter()
            .map(|&(r, c)| Coord::new(r, c))
            .collect();

        view.apply(&SolveEvent::Solved(path.clone()));

        for coord in &path {
            assert!(view.is_on_trail(*coord));
        }
        assert_eq!(view.rat(), Coord::new(2, 2));
    }

    #[test]
    fn draw_writes_the_maze_and_the_status_line() {
        let mut ui = setup_test_ui();
        let view = MazeView::new(&grid_with_block_at(1, 1));

        ui.draw(&view, RunState::Idle, MazeSpec::new(3, 1), true)
            .expect("drawing into a buffer should not fail");

        let output = String::from_utf8_lossy(&ui.stdout);
        assert!(output.contains("██"));
        assert!(output.contains("State: Idle"));
        assert!(output.contains("Maze generated. Press s to start."));
        assert!(!output.contains("(locked)"));
    }

    #[test]
    fn draw_marks_inputs_as_locked_while_running() {
        let mut ui = setup_test_ui();
        let view = MazeView::new(&grid_with_block_at(1, 1));

        ui.draw(&view, RunState::Running, MazeSpec::new(3, 1), false)
            .expect("drawing into a buffer should not fail");

        let output = String::from_utf8_lossy(&ui.stdout);
        assert!(output.contains("(locked)"));
        assert!(output.contains("Rat is moving..."));
    }
}
