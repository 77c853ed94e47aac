use std::process;

use crossterm::terminal;

use app::{run, ui::TerminalUi};

fn main() {
    ctrlc::set_handler(move || {
        terminal::disable_raw_mode().ok();
        process::exit(0);
    })
    .expect("error setting Ctrl-C handler");

    let settings = common::config::load();

    let mut ui = match TerminalUi::new() {
        Ok(ui) => ui,
        Err(e) => {
            eprintln!("Error: failed to set up the terminal.");
            eprintln!("Details: {}.", e);
            process::exit(1);
        }
    };

    if let Err(e) = run::run(settings, &mut ui) {
        drop(ui);
        eprintln!("Error: terminal I/O failed.");
        eprintln!("Details: {}.", e);
        process::exit(1);
    }
}
