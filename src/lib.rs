//! Skyward Dash - A vertical endless platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, platforms, generation, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Key-value preferences store
//! - `session`: Glue between the simulation and the audio/persistence hooks

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{StoreError, TuningError};
pub use highscores::HighScore;
pub use session::GameSession;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted from the host clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
