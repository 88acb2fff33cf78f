//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platform insertion order)
//! - No rendering, audio or storage dependencies

pub mod bounds;
pub mod camera;
pub mod collision;
pub mod danger_floor;
pub mod generator;
pub mod platform;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use bounds::Aabb;
pub use camera::CameraController;
pub use collision::{Landing, check_danger_floor_collision, check_platform_collisions};
pub use danger_floor::DangerFloor;
pub use generator::PlatformGenerator;
pub use platform::{Platform, PlatformKind};
pub use player::{AnimationState, Player};
pub use score::ScoreSystem;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
