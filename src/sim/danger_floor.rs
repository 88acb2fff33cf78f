//! The rising hazard line

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DangerFloor {
    height: f32,
    /// Base rise speed (units/s) before multipliers
    speed: f32,
    width: f32,
    tuning: Tuning,
}

impl DangerFloor {
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_height(tuning.danger_start_height, tuning)
    }

    pub fn with_height(height: f32, tuning: &Tuning) -> Self {
        Self {
            height,
            speed: tuning.rising_floor_speed,
            width: tuning.world_width,
            tuning: *tuning,
        }
    }

    /// Rise for one step. Nothing happens during the grace period.
    pub fn update(&mut self, dt: f32, score: u64, game_time: f32, player_y: f32) {
        if game_time <= self.tuning.danger_grace_period {
            return;
        }
        let multiplier = self.speed_multiplier(score, game_time, player_y);
        let rise = self.speed * multiplier * dt;
        if rise.is_finite() && rise > 0.0 {
            self.height += rise;
        }
    }

    /// Combined pace multiplier; every factor is >= 1 so the floor never slows below base speed
    pub fn speed_multiplier(&self, score: u64, game_time: f32, player_y: f32) -> f32 {
        let t = &self.tuning;

        let over_score = score.saturating_sub(u64::from(t.danger_score_floor)) as f32;
        let score_factor = 1.0 + (over_score / t.danger_score_step) * t.danger_score_ramp;

        let since_grace = (game_time - t.danger_grace_period).max(0.0);
        let time_factor = 1.0 + (since_grace / 60.0) * t.danger_time_ramp;

        let over_height = (player_y - t.danger_height_threshold).max(0.0);
        let height_factor = 1.0 + over_height / t.danger_height_step;

        let multiplier = score_factor * time_factor * height_factor;
        if multiplier.is_finite() { multiplier.max(1.0) } else { 1.0 }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grace_period_holds_floor() {
        let t = Tuning::default();
        let mut floor = DangerFloor::new(&t);
        floor.update(1.0, 5000, t.danger_grace_period, 10_000.0);
        assert_eq!(floor.height(), t.danger_start_height);
    }

    #[test]
    fn test_rises_at_base_speed_without_bonuses() {
        let t = Tuning::default();
        let mut floor = DangerFloor::new(&t);
        floor.update(1.0, 0, t.danger_grace_period + 0.0001, 0.0);
        let risen = floor.height() - t.danger_start_height;
        assert!((risen - t.rising_floor_speed).abs() < 0.01);
    }

    #[test]
    fn test_multiplier_grows_with_each_input() {
        let t = Tuning::default();
        let floor = DangerFloor::new(&t);
        let base = floor.speed_multiplier(0, t.danger_grace_period, 0.0);
        assert_eq!(base, 1.0);
        assert!(floor.speed_multiplier(2000, t.danger_grace_period, 0.0) > base);
        assert!(floor.speed_multiplier(0, t.danger_grace_period + 120.0, 0.0) > base);
        assert!(floor.speed_multiplier(0, t.danger_grace_period, 5000.0) > base);
    }

    proptest! {
        #[test]
        fn prop_height_never_decreases(
            steps in prop::collection::vec((0.0f32..0.2, 0u64..100_000, -2000.0f32..50_000.0), 1..100)
        ) {
            let t = Tuning::default();
            let mut floor = DangerFloor::new(&t);
            let mut time = 0.0;
            let mut last = floor.height();
            for (dt, score, player_y) in steps {
                time += dt;
                floor.update(dt, score, time, player_y);
                prop_assert!(floor.height() >= last);
                prop_assert!(floor.speed_multiplier(score, time, player_y) >= 1.0);
                last = floor.height();
            }
        }
    }
}
