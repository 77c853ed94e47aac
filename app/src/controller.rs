use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use rand::Rng;
use strum::Display;

use common::{
    grid::{Grid, generator::{self, MazeSpec}},
    solve::{self, SolveControl, SolveEvent, StepSink},
};

/// Rapid size/block changes collapse into one rebuild: a pending spec is
/// applied only after the inputs have been quiet for this long.
pub const RECONFIGURE_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Solved,
    Exhausted,
    Cancelled,
}

struct ActiveRun {
    control: Arc<SolveControl>,
    worker: thread::JoinHandle<()>,
}

struct PendingSpec {
    spec: MazeSpec,
    requested_at: Instant,
}

// Tags every event with the run it belongs to, so the controller can drop
// events from a run that has since been cancelled.
struct ChannelSink {
    run: u64,
    sender: Sender<(u64, SolveEvent)>,
}

impl StepSink for ChannelSink {
    fn emit(&mut self, event: SolveEvent) {
        // The receiver only goes away when the controller does; a failed
        // send just means nobody is listening anymore.
        let _ = self.sender.send((self.run, event));
    }
}

/// Owns the run lifecycle for one grid at a time. All Run State transitions
/// are funneled through here: commands come in from the UI loop, step events
/// come back from the solver thread, and at most one solver runs at once.
pub struct Controller {
    spec: MazeSpec,
    step_delay: Duration,
    grid: Arc<Grid>,
    state: RunState,
    run: u64,
    active: Option<ActiveRun>,
    sender: Sender<(u64, SolveEvent)>,
    events: Receiver<(u64, SolveEvent)>,
    pending: Option<PendingSpec>,
}

impl Controller {
    pub fn new(spec: MazeSpec, step_delay: Duration, rng: &mut impl Rng) -> Controller {
        let (sender, events) = mpsc::channel();
        Controller {
            spec,
            step_delay,
            grid: Arc::new(generator::generate(spec, rng)),
            state: RunState::Idle,
            run: 0,
            active: None,
            sender,
            events,
            pending: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn spec(&self) -> MazeSpec {
        self.spec
    }

    /// The spec the next rebuild will use: the pending one if a
    /// reconfiguration is waiting out its quiet period, else the current.
    pub fn effective_spec(&self) -> MazeSpec {
        self.pending.as_ref().map_or(self.spec, |p| p.spec)
    }

    /// UI policy signal: size and block inputs are locked while a run is in
    /// flight.
    pub fn inputs_enabled(&self) -> bool {
        !matches!(self.state, RunState::Running | RunState::Paused)
    }

    /// Starts a run over the current grid. Ignored unless Idle; after a
    /// terminal outcome the maze must be restarted before running again.
    pub fn start(&mut self) {
        if self.state != RunState::Idle {
            return;
        }

        self.run += 1;
        let control = Arc::new(SolveControl::new(self.step_delay));
        let mut sink = ChannelSink {
            run: self.run,
            sender: self.sender.clone(),
        };

        let worker = {
            let grid = Arc::clone(&self.grid);
            let control = Arc::clone(&control);
            thread::spawn(move || {
                // The outcome reaches the controller as the terminal event.
                solve::solve(&grid, &control, &mut sink);
            })
        };

        self.active = Some(ActiveRun { control, worker });
        self.state = RunState::Running;
    }

    /// One command flips both ways: Running pauses, Paused resumes.
    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => {
                if let Some(active) = &self.active {
                    active.control.set_paused(true);
                }
                self.state = RunState::Paused;
            }
            RunState::Paused => {
                if let Some(active) = &self.active {
                    active.control.set_paused(false);
                }
                self.state = RunState::Running;
            }
            _ => {}
        }
    }

    /// Cancels any in-flight run and generates a fresh grid from the current
    /// spec. The worker is joined before regeneration, so its suspension
    /// points observe cancellation before a new run can start.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        if self.cancel_active() {
            self.state = RunState::Cancelled;
        }
        self.grid = Arc::new(generator::generate(self.spec, rng));
        self.state = RunState::Idle;
    }

    pub fn change_size(&mut self, size: usize, now: Instant) {
        let spec = self.effective_spec().with_size(size);
        self.pending = Some(PendingSpec {
            spec,
            requested_at: now,
        });
    }

    pub fn change_block_count(&mut self, block_count: usize, now: Instant) {
        let spec = self.effective_spec().with_block_count(block_count);
        self.pending = Some(PendingSpec {
            spec,
            requested_at: now,
        });
    }

    /// Applies a pending reconfiguration once its quiet period has elapsed.
    /// Returns true when the grid was rebuilt and any view of it is stale.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        let elapsed = match &self.pending {
            Some(pending) => now.duration_since(pending.requested_at),
            None => return false,
        };
        if elapsed < RECONFIGURE_QUIET_PERIOD {
            return false;
        }

        let pending = self.pending.take().expect("pending spec checked above");
        self.spec = pending.spec;
        self.restart(rng);
        true
    }

    /// Next step event of the current run, if any. Events from earlier runs
    /// are silently dropped, as are terminal outcomes that arrive after a
    /// restart. Terminal events move the state machine.
    pub fn poll_event(&mut self) -> Option<SolveEvent> {
        while let Ok((run, event)) = self.events.try_recv() {
            if run != self.run {
                continue;
            }

            match &event {
                SolveEvent::Solved(_) => {
                    self.finish_run();
                    self.state = RunState::Solved;
                }
                SolveEvent::Exhausted => {
                    self.finish_run();
                    self.state = RunState::Exhausted;
                }
                SolveEvent::Cancelled => {
                    self.finish_run();
                    self.state = RunState::Cancelled;
                }
                SolveEvent::CellEntered(_) | SolveEvent::CellBacktracked(_) => {}
            }

            return Some(event);
        }

        None
    }

    // Returns true if a run was actually in flight.
    fn cancel_active(&mut self) -> bool {
        // Bump the run counter first so everything the old run already sent
        // is stale by the time we drain the channel again.
        self.run += 1;

        match self.active.take() {
            Some(active) => {
                active.control.cancel();
                let _ = active.worker.join();
                true
            }
            None => false,
        }
    }

    fn finish_run(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.worker.join();
        }
    }
}
