use std::{
    sync::{Condvar, Mutex},
    time::{Duration, Instant},
};

use crate::grid::{Coord, Grid};

// Upper bound on how long a paused solver waits between wakeup checks, so a
// missed notification cannot leave resume hanging.
pub const PAUSE_WAKE_INTERVAL: Duration = Duration::from_millis(100);

// Neighbor priority is fixed: down, right, up, left. Tests and the rendering
// layer rely on this exact visitation order.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveEvent {
    CellEntered(Coord),
    CellBacktracked(Coord),
    Solved(Vec<Coord>),
    Exhausted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Vec<Coord>),
    Exhausted,
    Cancelled,
}

/// Receives step events in exactly the order cells are entered and
/// backtracked, followed by a single terminal event.
pub trait StepSink {
    fn emit(&mut self, event: SolveEvent);
}

#[derive(Default)]
struct ControlFlags {
    paused: bool,
    cancelled: bool,
}

/// Shared handle coordinating one run. The controller flips the pause and
/// cancel flags from its thread; the solver blocks on them at every
/// suspension point. Cancellation is cooperative: the solver observes it at
/// the next suspension or recursion boundary.
pub struct SolveControl {
    flags: Mutex<ControlFlags>,
    signal: Condvar,
    step_delay: Duration,
}

impl SolveControl {
    pub fn new(step_delay: Duration) -> SolveControl {
        SolveControl {
            flags: Mutex::new(ControlFlags::default()),
            signal: Condvar::new(),
            step_delay,
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn is_paused(&self) -> bool {
        self.lock_flags().paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock_flags().cancelled
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock_flags().paused = paused;
        self.signal.notify_all();
    }

    pub fn cancel(&self) {
        self.lock_flags().cancelled = true;
        self.signal.notify_all();
    }

    /// Poll point at a recursion boundary: blocks while paused, returns
    /// false once cancelled.
    fn checkpoint(&self) -> bool {
        let mut flags = self.lock_flags();
        loop {
            if flags.cancelled {
                return false;
            }
            if !flags.paused {
                return true;
            }
            let (guard, _) = self
                .signal
                .wait_timeout(flags, PAUSE_WAKE_INTERVAL)
                .expect("solve control mutex poisoned");
            flags = guard;
        }
    }

    /// Suspends for the step delay, waking early on cancellation and
    /// holding while paused. Pause and cancel state are checked both before
    /// and after the delay elapses. Returns false once cancelled.
    fn wait_step(&self) -> bool {
        let deadline = Instant::now() + self.step_delay;
        let mut flags = self.lock_flags();
        loop {
            if flags.cancelled {
                return false;
            }
            if flags.paused {
                let (guard, _) = self
                    .signal
                    .wait_timeout(flags, PAUSE_WAKE_INTERVAL)
                    .expect("solve control mutex poisoned");
                flags = guard;
                continue;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let (guard, _) = self
                .signal
                .wait_timeout(flags, deadline - now)
                .expect("solve control mutex poisoned");
            flags = guard;
        }
    }

    fn lock_flags(&self) -> std::sync::MutexGuard<'_, ControlFlags> {
        self.flags.lock().expect("solve control mutex poisoned")
    }
}

// Per-call result of the recursive descent. Found and Cancelled both stop
// all further neighbor exploration up the whole call chain; there is no
// shared "solved" flag to consult.
enum Probe {
    Found,
    NotFound,
    Cancelled,
}

struct Search<'a> {
    grid: &'a Grid,
    control: &'a SolveControl,
    visited: Vec<Vec<bool>>,
    path: Vec<Coord>,
}

/// Depth-first traversal from the grid's start toward its destination,
/// pacing each entry and backtrack by the control handle's step delay. The
/// start cell is pushed and paced but emits no `CellEntered`; the first
/// event observed is the first cell moved into.
pub fn solve(grid: &Grid, control: &SolveControl, sink: &mut dyn StepSink) -> Outcome {
    let n = grid.size();
    let start = grid.start();

    let mut search = Search {
        grid,
        control,
        visited: vec![vec![false; n]; n],
        path: Vec::new(),
    };
    search.visited[start.row][start.col] = true;
    search.path.push(start);

    if !control.wait_step() {
        sink.emit(SolveEvent::Cancelled);
        return Outcome::Cancelled;
    }

    match search.explore_neighbors(sink, start) {
        Probe::Found => {
            let path = search.path;
            sink.emit(SolveEvent::Solved(path.clone()));
            Outcome::Solved(path)
        }
        Probe::NotFound => {
            sink.emit(SolveEvent::Exhausted);
            Outcome::Exhausted
        }
        Probe::Cancelled => {
            sink.emit(SolveEvent::Cancelled);
            Outcome::Cancelled
        }
    }
}

impl Search<'_> {
    fn enter(&mut self, sink: &mut dyn StepSink, coord: Coord) -> Probe {
        if !self.control.checkpoint() {
            return Probe::Cancelled;
        }

        // The destination short-circuits before being marked visited, so it
        // can never be backtracked.
        if coord == self.grid.destination() {
            self.path.push(coord);
            return Probe::Found;
        }

        self.visited[coord.row][coord.col] = true;
        self.path.push(coord);
        sink.emit(SolveEvent::CellEntered(coord));
        if !self.control.wait_step() {
            return Probe::Cancelled;
        }

        match self.explore_neighbors(sink, coord) {
            Probe::NotFound => {
                self.path.pop();
                sink.emit(SolveEvent::CellBacktracked(coord));
                if !self.control.wait_step() {
                    return Probe::Cancelled;
                }
                Probe::NotFound
            }
            short_circuit => short_circuit,
        }
    }

    fn explore_neighbors(&mut self, sink: &mut dyn StepSink, from: Coord) -> Probe {
        for (row_offset, col_offset) in NEIGHBOR_OFFSETS {
            let row = from.row as isize + row_offset;
            let col = from.col as isize + col_offset;
            if !self.grid.contains(row, col) {
                continue;
            }

            let next = Coord::new(row as usize, col as usize);
            if !self.grid.is_open(next) || self.visited[next.row][next.col] {
                continue;
            }

            match self.enter(sink, next) {
                Probe::NotFound => {}
                short_circuit => return short_circuit,
            }
        }

        Probe::NotFound
    }
}
