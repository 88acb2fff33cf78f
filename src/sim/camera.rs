//! Vertical follow camera with a safe zone

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::lerp;
use crate::tuning::Tuning;

/// Falling faster than this (units/s, downward) makes the camera follow down
const FALL_FOLLOW_SPEED: f32 = -50.0;
/// Below `safe_zone * DEEP_FACTOR` under centre the camera follows regardless of speed
const DEEP_FACTOR: f32 = 1.5;
const UP_RATE: f32 = 3.0;
const DOWN_RATE: f32 = 2.5;
/// Cap on the per-frame interpolation factor
const MAX_LERP: f32 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraController {
    /// Camera centre in world space
    pos: Vec2,
    target_y: f32,
    highest_player_y: f32,
    tuning: Tuning,
}

impl CameraController {
    pub fn new(tuning: &Tuning) -> Self {
        let start_y = tuning.camera_start_y;
        Self {
            pos: Vec2::new(tuning.world_width / 2.0, start_y),
            target_y: start_y,
            highest_player_y: start_y,
            tuning: *tuning,
        }
    }

    pub fn update(&mut self, player: &Player, dt: f32) {
        let t = &self.tuning;
        let safe_zone = t.camera_safe_zone();
        let player_y = player.center_y();

        self.highest_player_y = self.highest_player_y.max(player_y);

        let zone_bottom = self.pos.y - safe_zone;
        let zone_top = self.pos.y + safe_zone;

        if player_y > zone_top {
            self.target_y = self.target_y.max(player_y - safe_zone);
        }

        if player_y < zone_bottom {
            let deep = player_y < self.pos.y - safe_zone * DEEP_FACTOR;
            if player.vel.y < FALL_FOLLOW_SPEED || deep {
                self.target_y = (player_y + safe_zone).max(t.camera_min_y);
            }
        }

        let rate = if self.target_y > self.pos.y {
            UP_RATE
        } else {
            DOWN_RATE
        };
        let factor = (t.camera_smooth_speed * rate * dt).min(MAX_LERP);
        self.pos.y = lerp(self.pos.y, self.target_y, factor);
        self.pos.x = t.world_width / 2.0;
    }

    pub fn reset(&mut self) {
        let tuning = self.tuning;
        *self = Self::new(&tuning);
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn highest_player_y(&self) -> f32 {
        self.highest_player_y
    }
}
