//! Headless runner
//!
//! Usage: `skyward-dash [seed] [seconds] [tuning.json]`
//!
//! Plays the game with the autopilot at a simulated 60 fps, restarting after
//! each game over, and prints a summary per run.

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use skyward_dash::audio::LogBackend;
use skyward_dash::persistence::FileStore;
use skyward_dash::sim::GameEvent;
use skyward_dash::{GameSession, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    let seconds = match args.next() {
        Some(s) => s.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    log::info!("Skyward Dash (headless) seed={seed} seconds={seconds}");

    let store = FileStore::open(FileStore::default_path());
    let mut session = GameSession::new(seed, tuning, Box::new(store), Some(Box::new(LogBackend)));
    session.input.idle_mode = true;

    let frames = (seconds.max(0.0) / FRAME_DT) as u64;
    let mut runs = 0u32;
    for _ in 0..frames {
        for event in session.update(FRAME_DT) {
            if let GameEvent::GameOver { score, floor } = event {
                runs += 1;
                println!(
                    "Run {runs}: score {score}, floor {floor}, {:.1}s{}",
                    session.state.game_time,
                    if session.is_new_high_score() { " (new best)" } else { "" }
                );
                session.input.restart = true;
            }
        }
    }

    if !session.state.is_game_over() {
        println!(
            "Unfinished run: score {}, floor {}, {:.1}s",
            session.state.score.score(),
            session.state.generator.current_floor(),
            session.state.game_time
        );
    }
    println!("{runs} runs finished, best score {}", session.high_score());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only; the library is the wasm surface
}
