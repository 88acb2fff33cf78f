//! Game state and session-level simulation types
//!
//! Everything a run needs to be replayed from its seed lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraController;
use super::danger_floor::DangerFloor;
use super::generator::PlatformGenerator;
use super::platform::PlatformKind;
use super::player::Player;
use super::score::ScoreSystem;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until the pause edge is seen again
    Paused,
    /// Player fell below the danger floor
    GameOver,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { combo: u32 },
    Landed { platform_id: u32, kind: PlatformKind },
    CelebrationFloor { floor: u32 },
    GameOver { score: u64, floor: u32 },
    Paused,
    Resumed,
    Restarted,
    ReturnToMenu,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds of unpaused play since the run started
    pub game_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub danger_floor: DangerFloor,
    pub generator: PlatformGenerator,
    pub score: ScoreSystem,
    pub camera: CameraController,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let generator = PlatformGenerator::new(&tuning, &mut rng);
        log::info!("New run, seed {seed}");
        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            game_time: 0.0,
            time_ticks: 0,
            player: Player::new(&tuning),
            danger_floor: DangerFloor::new(&tuning),
            generator,
            score: ScoreSystem::new(&tuning),
            camera: CameraController::new(&tuning),
            events: Vec::new(),
            tuning,
        }
    }

    /// Start over in place. The RNG keeps running so consecutive runs differ.
    pub fn restart(&mut self) {
        self.player.reset();
        self.danger_floor = DangerFloor::new(&self.tuning);
        self.generator.reset(&mut self.rng);
        self.score.reset();
        self.camera.reset();
        self.game_time = 0.0;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the previous call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
