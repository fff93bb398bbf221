//! Bubble Arena headless runner
//!
//! Plays one level in idle mode at a fixed frame rate and logs the result.
//!
//! Usage: `bubble-arena [LEVEL] [SEED] [--tuning FILE] [--scores FILE]`

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use bubble_arena::consts::{MAX_SUBSTEPS, SIM_DT};
use bubble_arena::level::LEVEL_COUNT;
use bubble_arena::sim::{GameState, TickInput, tick};
use bubble_arena::{HighScores, LevelConfig, Tuning};

/// Host frame time the accumulator is fed with
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a level after this much simulated time
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Play one level unattended and report the outcome
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level from the built-in table
    #[arg(
        value_name = "LEVEL",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(LEVEL_COUNT))
    )]
    level: u32,
    /// Seed for the level layout and loaded bubbles
    #[arg(value_name = "SEED", default_value_t = 1)]
    seed: u64,
    /// JSON file overriding the default tuning
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
    /// JSON leaderboard file to record the outcome in
    #[arg(long, value_name = "FILE")]
    scores: Option<PathBuf>,
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match fs::read_to_string(path).map(|json| Tuning::from_json(&json)) {
        Ok(Ok(tuning)) => tuning,
        Ok(Err(e)) => {
            log::warn!("Bad tuning file {}: {e}, using defaults", path.display());
            Tuning::default()
        }
        Err(e) => {
            log::warn!("Can't read {}: {e}, using defaults", path.display());
            Tuning::default()
        }
    }
}

fn load_scores(path: &PathBuf) -> HighScores {
    match fs::read_to_string(path).map(|json| HighScores::from_json(&json)) {
        Ok(Ok(scores)) => scores,
        _ => {
            log::info!("No high scores found, starting fresh");
            HighScores::new()
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();
    log::info!("Bubble Arena (headless) level {} seed {}", args.level, args.seed);

    let tuning = load_tuning(args.tuning.as_ref());
    let mut state = GameState::new(LevelConfig::for_level(args.level), tuning, args.seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut accumulator = 0.0;
    for _ in 0..MAX_FRAMES {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        if state.is_over() {
            break;
        }
    }

    let Some(outcome) = state.outcome() else {
        log::warn!(
            "Level {} still running after {} ticks, score {}",
            args.level,
            state.time_ticks,
            state.score
        );
        return;
    };
    log::info!(
        "Level {} {} with score {} ({} shots left, {} ticks)",
        outcome.level,
        if outcome.won { "won" } else { "lost" },
        outcome.score,
        outcome.shots_remaining,
        state.time_ticks
    );

    if let Some(path) = &args.scores {
        let mut scores = load_scores(path);
        scores.add_outcome(&outcome);
        match scores.to_json().map(|json| fs::write(path, json)) {
            Ok(Ok(())) => log::info!("High scores saved ({} entries)", scores.entries.len()),
            Ok(Err(e)) => log::warn!("Can't write {}: {e}", path.display()),
            Err(e) => log::warn!("Can't encode high scores: {e}"),
        }
    }
}
