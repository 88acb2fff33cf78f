//! Player physics body and jump/combo/animation state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::tuning::Tuning;

/// Below this horizontal speed a grounded player counts as standing still
const RUN_ANIMATION_THRESHOLD: f32 = 10.0;
/// Landings slower than this get their horizontal speed damped
const LANDING_DAMP_THRESHOLD: f32 = 50.0;
const LANDING_DAMP_FACTOR: f32 = 0.8;

/// Visual state derived from velocity and grounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    bounds: Aabb,
    on_ground: bool,
    /// Grounding as of the previous `update`
    was_on_ground: bool,
    /// 0..1, recomputed every update from speed and combo
    momentum: f32,
    combo_count: u32,
    has_air_jump: bool,
    coyote_time: f32,
    /// Id of the platform currently underfoot, once known
    standing_on: Option<u32>,
    animation: AnimationState,
    animation_time: f32,
    tuning: Tuning,
}

impl Player {
    /// Spawn at the tuning's start position, standing on the ground row
    pub fn new(tuning: &Tuning) -> Self {
        Self::at(tuning.player_start(), tuning)
    }

    pub fn at(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            bounds: Aabb::new(pos, tuning.player_width, tuning.player_height),
            on_ground: true,
            was_on_ground: true,
            momentum: 0.0,
            combo_count: 0,
            has_air_jump: true,
            coyote_time: 0.0,
            standing_on: None,
            animation: AnimationState::Idle,
            animation_time: 0.0,
            tuning: *tuning,
        }
    }

    /// Put the player back at the start (restart, not respawn)
    pub fn reset(&mut self) {
        let tuning = self.tuning;
        *self = Self::new(&tuning);
    }

    /// Advance physics by one step
    pub fn update(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "negative dt: {dt}");
        let dt = dt.max(0.0);
        let t = &self.tuning;

        self.was_on_ground = self.on_ground;
        if self.coyote_time > 0.0 {
            self.coyote_time = (self.coyote_time - dt).max(0.0);
        }

        if !self.on_ground {
            self.vel.y = (self.vel.y + t.gravity * dt).max(t.terminal_velocity);
        }

        // Factors are per reference frame; rescale so the tick rate does not change top speed
        let friction = if self.on_ground {
            t.ground_friction
        } else {
            t.air_friction
        };
        self.vel.x *= friction.powf(dt * t.friction_reference_hz);

        self.momentum = self.compute_momentum();

        self.pos += self.vel * dt;

        // Invisible walls
        let max_x = t.world_width - t.player_width;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }

        self.bounds.set_position(self.pos);

        self.animation = if !self.on_ground {
            if self.vel.y > 0.0 {
                AnimationState::Jumping
            } else {
                AnimationState::Falling
            }
        } else if self.vel.x.abs() > RUN_ANIMATION_THRESHOLD {
            AnimationState::Running
        } else {
            AnimationState::Idle
        };
        self.animation_time += dt;
    }

    fn compute_momentum(&self) -> f32 {
        let max_speed = self.tuning.max_horizontal_speed;
        let speed = self.vel.x.abs();
        let speed_ratio = speed / (max_speed * 0.6);
        let combo_bonus = (self.combo_count as f32 / 5.0).min(0.4);

        let mut momentum = (speed_ratio + combo_bonus).min(1.0);
        if speed > max_speed * 0.4 {
            momentum = (momentum + 0.3).min(1.0);
        }
        if speed > max_speed * 0.7 {
            momentum = (momentum + 0.2).min(1.0);
        }
        if momentum.is_finite() { momentum } else { 0.0 }
    }

    pub fn move_left(&mut self, dt: f32) {
        self.accelerate(-1.0, dt);
    }

    pub fn move_right(&mut self, dt: f32) {
        self.accelerate(1.0, dt);
    }

    fn accelerate(&mut self, direction: f32, dt: f32) {
        let t = &self.tuning;
        let multiplier = self.speed_multiplier();
        let mut acceleration = t.horizontal_acceleration;
        if !self.on_ground {
            acceleration *= t.air_control;
        }
        acceleration *= multiplier;

        let max_speed = t.max_horizontal_speed * multiplier;
        self.vel.x = (self.vel.x + direction * acceleration * dt).clamp(-max_speed, max_speed);
    }

    /// Horizontal speed multiplier earned by the current combo
    pub fn speed_multiplier(&self) -> f32 {
        let t = &self.tuning;
        if self.combo_count < t.combo_start_threshold {
            return 1.0;
        }
        let levels = (self.combo_count - t.combo_start_threshold + 1).min(t.max_combo_levels);
        1.0 + levels as f32 * t.combo_speed_boost
    }

    /// Try to jump. Returns false (and changes nothing) when no jump permission holds.
    pub fn jump(&mut self) -> bool {
        if !(self.on_ground || self.coyote_time > 0.0 || self.has_air_jump) {
            return false;
        }
        let t = &self.tuning;
        self.vel.y = t.base_jump_height + (t.max_jump_height - t.base_jump_height) * self.momentum;

        if self.was_on_ground {
            self.combo_count = 1;
        } else {
            self.combo_count += 1;
        }

        if !self.on_ground && self.coyote_time <= 0.0 {
            self.has_air_jump = false;
        }

        self.on_ground = false;
        self.coyote_time = 0.0;
        self.standing_on = None;
        true
    }

    /// Nothing underfoot any more. Walking off a ledge opens the coyote window
    /// right away, so a jump on the very next tick still counts as grounded.
    pub fn leave_ground(&mut self) {
        if self.on_ground && self.vel.y <= 0.0 {
            self.coyote_time = self.tuning.coyote_time;
        }
        self.on_ground = false;
        self.standing_on = None;
    }

    pub fn land_on_platform(&mut self) {
        self.on_ground = true;
        self.vel.y = 0.0;
        self.has_air_jump = true;
        self.coyote_time = 0.0;
        // Near-stationary landings settle instead of jittering
        if self.vel.x.abs() < LANDING_DAMP_THRESHOLD {
            self.vel.x *= LANDING_DAMP_FACTOR;
        }
    }

    pub fn reset_combo(&mut self) {
        self.combo_count = 0;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.bounds.set_position(pos);
    }

    pub fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }

    /// Record which platform the player is standing on
    pub fn set_standing_on(&mut self, platform_id: u32) {
        self.standing_on = Some(platform_id);
    }

    pub fn standing_on(&self) -> Option<u32> {
        self.standing_on
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn was_on_ground(&self) -> bool {
        self.was_on_ground
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn has_air_jump(&self) -> bool {
        self.has_air_jump
    }

    pub fn coyote_time(&self) -> f32 {
        self.coyote_time
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }

    /// Jump impulse at full momentum
    pub fn max_jump_height(&self) -> f32 {
        self.tuning.max_jump_height
    }

    pub fn width(&self) -> f32 {
        self.tuning.player_width
    }

    pub fn height(&self) -> f32 {
        self.tuning.player_height
    }

    /// Vertical centre, used by the camera
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.tuning.player_height / 2.0
    }
}
