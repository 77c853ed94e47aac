use std::{env, time::Duration};

use crate::grid::generator::MazeSpec;

pub const DEFAULT_SIZE: usize = 10;
pub const DEFAULT_BLOCK_COUNT: usize = 25;
pub const DEFAULT_STEP_DELAY_MS: u64 = 2000;

/// Startup settings, read from the environment (or a `.env` file) and
/// sanitized. Unset or unparsable values fall back to the defaults; the
/// maze dimensions are clamped by `MazeSpec`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub spec: MazeSpec,
    pub step_delay: Duration,
}

pub fn load() -> Settings {
    dotenvy::dotenv().ok();

    let size = parse_var("MAZE_SIZE", DEFAULT_SIZE);
    let block_count = parse_var("MAZE_BLOCKS", DEFAULT_BLOCK_COUNT);
    let step_delay_ms = parse_var("STEP_DELAY_MS", DEFAULT_STEP_DELAY_MS).max(1);

    Settings {
        spec: MazeSpec::new(size, block_count),
        step_delay: Duration::from_millis(step_delay_ms),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
