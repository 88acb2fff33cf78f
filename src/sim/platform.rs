//! Platforms and their behavior variants
//!
//! Each variant has its own timer-driven update and its own response to a
//! player landing. Breakable and falling platforms respawn at their original
//! position instead of being consumed for good.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::player::Player;

/// Bouncy landing impulse as a multiple of the max jump height
pub const BOUNCY_MULTIPLIER: f32 = 1.5;
/// Seconds between first landing and a falling platform dropping
pub const FALLING_DELAY: f32 = 0.5;
pub const FALLING_SPEED: f32 = 200.0;
/// A falling platform respawns once it is this far below where it spawned
pub const FALLING_RESPAWN_DEPTH: f32 = 600.0;
/// Peak horizontal speed of a moving platform
pub const MOVING_SPEED: f32 = 50.0;
/// Angular frequency of the moving platform oscillation (rad/s)
pub const MOVING_FREQUENCY: f32 = 2.0;
/// Seconds a breakable platform holds after the first landing
pub const BREAK_DELAY: f32 = 1.0;
/// Seconds from first landing until a broken platform comes back
pub const BREAK_RESPAWN_DELAY: f32 = 5.0;
/// Where broken platforms are parked while out of play
pub const HIDDEN_Y: f32 = -1000.0;
/// Icy landings multiply horizontal speed by this
pub const ICY_BOOST: f32 = 1.3;
/// Above this horizontal speed icy landings add a random slide
pub const ICY_SLIDE_THRESHOLD: f32 = 100.0;
/// Maximum random slide in either direction
pub const ICY_SLIDE_RANGE: f32 = 25.0;
/// Share of a moving platform's velocity handed to the player on landing
pub const MOVING_TRANSFER: f32 = 0.5;

/// Platform behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Forces a super-jump on landing
    Bouncy,
    /// Disappears shortly after use, comes back later
    Breakable,
    /// Slides left and right
    Moving,
    /// Slippery surface
    Icy,
    /// Drops when stepped on
    Falling,
}

impl PlatformKind {
    /// Whether a consumed platform of this kind returns to its spawn point
    pub fn can_respawn(&self) -> bool {
        matches!(self, PlatformKind::Breakable | PlatformKind::Falling)
    }
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    kind: PlatformKind,
    pos: Vec2,
    vel: Vec2,
    bounds: Aabb,
    original_pos: Vec2,
    visited: bool,
    state_timer: f32,
    should_remove: bool,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, kind: PlatformKind, width: f32, height: f32) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "malformed platform {width}x{height}"
        );
        let width = width.max(f32::EPSILON);
        let height = height.max(f32::EPSILON);
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            bounds: Aabb::new(pos, width, height),
            original_pos: pos,
            visited: false,
            state_timer: 0.0,
            should_remove: false,
        }
    }

    /// Per-frame behavior, called for every live platform
    pub fn update(&mut self, dt: f32) {
        self.state_timer += dt.max(0.0);

        match self.kind {
            PlatformKind::Moving => {
                self.vel.x = (self.state_timer * MOVING_FREQUENCY).sin() * MOVING_SPEED;
            }
            PlatformKind::Falling => self.update_falling(),
            PlatformKind::Breakable => self.update_breakable(),
            PlatformKind::Normal | PlatformKind::Bouncy | PlatformKind::Icy => {}
        }

        if !self.vel.is_finite() {
            log::warn!("Platform {} had non-finite velocity, stopping it", self.id);
            self.vel = Vec2::ZERO;
        }

        if self.vel != Vec2::ZERO {
            self.pos += self.vel * dt.max(0.0);
            self.bounds.set_position(self.pos);
        }
    }

    fn update_falling(&mut self) {
        if self.visited && self.state_timer > FALLING_DELAY {
            self.vel.y = -FALLING_SPEED;
            if self.pos.y < self.original_pos.y - FALLING_RESPAWN_DEPTH {
                if self.can_respawn() {
                    self.respawn();
                } else {
                    self.should_remove = true;
                }
            }
        }
    }

    fn update_breakable(&mut self) {
        if self.visited && self.state_timer > BREAK_DELAY {
            if self.can_respawn() {
                self.pos.y = HIDDEN_Y;
                self.bounds.set_position(self.pos);
                if self.state_timer > BREAK_RESPAWN_DELAY {
                    self.respawn();
                }
            } else {
                self.should_remove = true;
            }
        }
    }

    /// Apply this platform's landing response to the player.
    ///
    /// The caller invokes this once per new landing, after
    /// [`Player::land_on_platform`].
    pub fn on_player_landed<R: Rng>(&mut self, player: &mut Player, rng: &mut R) {
        if !self.visited {
            self.visited = true;
            self.state_timer = 0.0;
            if self.kind != PlatformKind::Normal {
                log::debug!("Player landed on {:?} platform {}", self.kind, self.id);
            }
        }

        match self.kind {
            PlatformKind::Bouncy => {
                player.vel.y = player.max_jump_height() * BOUNCY_MULTIPLIER;
            }
            PlatformKind::Icy => {
                player.vel.x *= ICY_BOOST;
                if player.vel.x.abs() > ICY_SLIDE_THRESHOLD {
                    player.vel.x += rng.random_range(-ICY_SLIDE_RANGE..=ICY_SLIDE_RANGE);
                }
            }
            PlatformKind::Moving => {
                player.vel.x += self.vel.x * MOVING_TRANSFER;
            }
            // Breakable and falling react through their own timers
            PlatformKind::Breakable | PlatformKind::Falling | PlatformKind::Normal => {}
        }

        if !player.vel.is_finite() {
            player.vel = Vec2::ZERO;
        }
    }

    /// Return to the spawn point as an unvisited platform
    pub fn respawn(&mut self) {
        self.pos = self.original_pos;
        self.bounds.set_position(self.original_pos);
        self.vel = Vec2::ZERO;
        self.visited = false;
        self.state_timer = 0.0;
        log::debug!("Respawned {:?} platform {}", self.kind, self.id);
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn original_pos(&self) -> Vec2 {
        self.original_pos
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn width(&self) -> f32 {
        self.bounds.width
    }

    pub fn height(&self) -> f32 {
        self.bounds.height
    }

    pub fn top(&self) -> f32 {
        self.bounds.top()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn can_respawn(&self) -> bool {
        self.kind.can_respawn()
    }

    pub fn should_remove(&self) -> bool {
        self.should_remove
    }

    /// Broken and parked off-screen, waiting to respawn
    pub fn is_hidden(&self) -> bool {
        self.kind == PlatformKind::Breakable && self.visited && self.state_timer > BREAK_DELAY
    }

    /// Render hook: a visited falling platform in the second half of its delay,
    /// about to drop. False once it is falling.
    pub fn is_warning(&self) -> bool {
        self.kind == PlatformKind::Falling
            && self.visited
            && self.state_timer > FALLING_DELAY * 0.5
            && self.state_timer <= FALLING_DELAY
    }
}
