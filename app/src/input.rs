use crossterm::event::{Event, KeyCode, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Restart,
    GrowGrid,
    ShrinkGrid,
    MoreBlocks,
    FewerBlocks,
    Quit,
}

pub fn interpret(event: &Event) -> Option<Command> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.modifiers == KeyModifiers::CONTROL {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::GrowGrid),
        KeyCode::Char('-') => Some(Command::ShrinkGrid),
        KeyCode::Char(']') => Some(Command::MoreBlocks),
        KeyCode::Char('[') => Some(Command::FewerBlocks),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
