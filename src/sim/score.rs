//! Height-based scoring with combo multiplier

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSystem {
    score: u64,
    /// Highest height level reached (watermark)
    highest_platform: u32,
    multiplier: f32,
    start_y: f32,
    level_spacing: f32,
    points_per_level: u32,
    combo_multiplier: f32,
}

impl ScoreSystem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            highest_platform: 0,
            multiplier: 1.0,
            start_y: tuning.player_start().y,
            level_spacing: tuning.max_platform_spacing_y,
            points_per_level: tuning.base_score_per_platform,
            combo_multiplier: tuning.combo_multiplier,
        }
    }

    /// Award points for any new height levels the player has reached
    pub fn update(&mut self, player: &Player) {
        let height = player.pos.y - self.start_y;
        if height.is_nan() || height <= 0.0 {
            return;
        }
        let level = (height / self.level_spacing) as u32;
        if level <= self.highest_platform {
            return;
        }

        let new_levels = level - self.highest_platform;
        self.highest_platform = level;

        self.multiplier = 1.0 + player.combo_count() as f32 * (self.combo_multiplier - 1.0);
        let base = u64::from(new_levels) * u64::from(self.points_per_level);
        self.score += (base as f32 * self.multiplier) as u64;
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.highest_platform = 0;
        self.multiplier = 1.0;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn highest_platform(&self) -> u32 {
        self.highest_platform
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn player_at(t: &Tuning, y: f32) -> Player {
        Player::at(Vec2::new(500.0, y), t)
    }

    #[test]
    fn test_no_score_at_or_below_start() {
        let t = Tuning::default();
        let mut s = ScoreSystem::new(&t);
        s.update(&player_at(&t, t.player_start().y));
        s.update(&player_at(&t, 0.0));
        assert_eq!(s.score(), 0);
        assert_eq!(s.highest_platform(), 0);
    }

    #[test]
    fn test_awards_per_new_level() {
        let t = Tuning::default();
        let mut s = ScoreSystem::new(&t);
        let start = t.player_start().y;

        s.update(&player_at(&t, start + 219.0));
        assert_eq!(s.score(), 0);

        s.update(&player_at(&t, start + 220.0 * 3.0 + 1.0));
        assert_eq!(s.highest_platform(), 3);
        assert_eq!(s.score(), 30);
    }

    #[test]
    fn test_combo_multiplies_points() {
        let t = Tuning::default();
        let mut s = ScoreSystem::new(&t);
        let mut p = player_at(&t, t.player_start().y + 221.0);
        p.jump(); // combo 1
        assert_eq!(p.combo_count(), 1);
        s.update(&p);
        assert_eq!(s.multiplier(), 2.0);
        assert_eq!(s.score(), 20);
    }

    #[test]
    fn test_revisiting_levels_pays_nothing() {
        let t = Tuning::default();
        let mut s = ScoreSystem::new(&t);
        let start = t.player_start().y;
        s.update(&player_at(&t, start + 1000.0));
        let score = s.score();
        s.update(&player_at(&t, start + 100.0));
        s.update(&player_at(&t, start + 1000.0));
        assert_eq!(s.score(), score);
    }

    #[test]
    fn test_reset() {
        let t = Tuning::default();
        let mut s = ScoreSystem::new(&t);
        s.update(&player_at(&t, 5000.0));
        s.reset();
        assert_eq!(s.score(), 0);
        assert_eq!(s.highest_platform(), 0);
        assert_eq!(s.multiplier(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_score_tracks_watermark(heights in prop::collection::vec(-500.0f32..20_000.0, 1..60)) {
            let t = Tuning::default();
            let mut s = ScoreSystem::new(&t);
            for y in heights {
                let before_score = s.score();
                let before_level = s.highest_platform();
                s.update(&player_at(&t, y));
                prop_assert!(s.highest_platform() >= before_level);
                if s.highest_platform() == before_level {
                    prop_assert_eq!(s.score(), before_score);
                } else {
                    prop_assert!(s.score() > before_score);
                }
            }
        }
    }
}
