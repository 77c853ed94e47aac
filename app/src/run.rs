use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::event;

use common::config::Settings;

use crate::{
    controller::Controller,
    input::{self, Command},
    ui::{MazeView, TerminalUi},
};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run<W: Write>(settings: Settings, ui: &mut TerminalUi<W>) -> io::Result<()> {
    let mut rng = rand::rng();
    let mut controller = Controller::new(settings.spec, settings.step_delay, &mut rng);
    let mut view = MazeView::new(controller.grid());

    draw(ui, &view, &controller)?;

    loop {
        let command = if event::poll(INPUT_POLL_INTERVAL)? {
            input::interpret(&event::read()?)
        } else {
            None
        };

        let mut dirty = command.is_some();

        if let Some(command) = command {
            let now = Instant::now();
            match command {
                Command::Quit => break,
                Command::Start => controller.start(),
                Command::TogglePause => controller.toggle_pause(),
                Command::Restart => {
                    controller.restart(&mut rng);
                    view = MazeView::new(controller.grid());
                }
                // Size and block inputs are locked while a run is active;
                // the controller signals the policy, the loop enforces it.
                Command::GrowGrid if controller.inputs_enabled() => {
                    let size = controller.effective_spec().size();
                    controller.change_size(size + 1, now);
                }
                Command::ShrinkGrid if controller.inputs_enabled() => {
                    let size = controller.effective_spec().size();
                    controller.change_size(size.saturating_sub(1), now);
                }
                Command::MoreBlocks if controller.inputs_enabled() => {
                    let blocks = controller.effective_spec().block_count();
                    controller.change_block_count(blocks + 1, now);
                }
                Command::FewerBlocks if controller.inputs_enabled() => {
                    let blocks = controller.effective_spec().block_count();
                    controller.change_block_count(blocks.saturating_sub(1), now);
                }
                Command::GrowGrid
                | Command::ShrinkGrid
                | Command::MoreBlocks
                | Command::FewerBlocks => {}
            }
        }

        if controller.tick(Instant::now(), &mut rng) {
            view = MazeView::new(controller.grid());
            dirty = true;
        }

        while let Some(event) = controller.poll_event() {
            view.apply(&event);
            dirty = true;
        }

        if dirty {
            draw(ui, &view, &controller)?;
        }
    }

    Ok(())
}

fn draw<W: Write>(
    ui: &mut TerminalUi<W>,
    view: &MazeView,
    controller: &Controller,
) -> io::Result<()> {
    ui.draw(
        view,
        controller.state(),
        controller.effective_spec(),
        controller.inputs_enabled(),
    )
}
