//! Data-driven game balance
//!
//! One immutable `Tuning` value is built at startup (defaults, optionally
//! overridden from JSON) and handed to every component constructor.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Difficulty bracket keyed by the generator's floor counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloorTier {
    Easy,
    Medium,
    Hard,
    Extreme,
}

/// Generation parameters for one floor tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    /// Platform width before jitter
    pub base_width: f32,
    /// Vertical spacing band
    pub min_spacing_y: f32,
    pub max_spacing_y: f32,
    /// Horizontal offset bound, in multiples of the platform's own width
    pub horizontal_gap_factor: f32,
    /// Probability that a platform is a special variant
    pub special_chance: f32,
}

/// All tunable gameplay constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Player physics ===
    /// Vertical acceleration while airborne (negative = down)
    pub gravity: f32,
    /// Most negative vertical velocity allowed
    pub terminal_velocity: f32,
    /// Jump impulse at zero momentum
    pub base_jump_height: f32,
    /// Jump impulse at full momentum
    pub max_jump_height: f32,
    pub horizontal_acceleration: f32,
    pub max_horizontal_speed: f32,
    /// Horizontal velocity retained per reference frame while grounded
    pub ground_friction: f32,
    /// Horizontal velocity retained per reference frame while airborne
    pub air_friction: f32,
    /// Frame rate the friction factors are expressed at (Hz)
    pub friction_reference_hz: f32,
    /// Acceleration factor while airborne
    pub air_control: f32,
    /// Grace window after walking off a ledge (seconds)
    pub coyote_time: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Combo ===
    /// Combo count at which the speed boost kicks in
    pub combo_start_threshold: u32,
    /// Speed boost per combo level
    pub combo_speed_boost: f32,
    pub max_combo_levels: u32,
    /// Score multiplier step per combo (x2, x3, ...)
    pub combo_multiplier: f32,

    // === Platforms ===
    pub platform_thickness: f32,
    pub platform_width_large: f32,
    pub platform_width_medium: f32,
    pub platform_width_small: f32,
    pub platform_width_tiny: f32,
    pub min_platform_width: f32,
    pub min_platform_spacing_y: f32,
    pub max_platform_spacing_y: f32,

    // === Generation ===
    pub ground_y: f32,
    pub ground_platforms: u32,
    pub seed_platforms: u32,
    /// How far above the player the stream is kept filled, in world heights
    pub lookahead_screens: f32,
    pub celebration_interval: u32,
    /// Last floor that may become a celebration floor
    pub celebration_cap: u32,
    pub floor_easy: u32,
    pub floor_medium: u32,
    pub floor_hard: u32,
    /// Platforms further than this many world heights below the player are pruned
    pub prune_screens: f32,

    // === Scoring ===
    pub base_score_per_platform: u32,

    // === Danger floor ===
    pub danger_start_height: f32,
    pub rising_floor_speed: f32,
    /// Seconds before the floor starts rising
    pub danger_grace_period: f32,
    /// Score above which the score ramp starts
    pub danger_score_floor: u32,
    /// Extra multiplier per `danger_score_step` points
    pub danger_score_ramp: f32,
    pub danger_score_step: f32,
    /// Extra multiplier per minute after the grace period
    pub danger_time_ramp: f32,
    /// Player height above which the height bonus starts
    pub danger_height_threshold: f32,
    /// Height above the threshold that adds +1 to the multiplier
    pub danger_height_step: f32,

    // === Camera ===
    pub camera_smooth_speed: f32,
    /// Safe zone half-height as a fraction of the world height
    pub camera_safe_zone_ratio: f32,
    pub camera_start_y: f32,
    pub camera_min_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 1920.0,
            world_height: 1080.0,

            gravity: -600.0,
            terminal_velocity: -1000.0,
            base_jump_height: 400.0,
            max_jump_height: 600.0,
            horizontal_acceleration: 1800.0,
            max_horizontal_speed: 750.0,
            ground_friction: 0.95,
            air_friction: 0.98,
            friction_reference_hz: 60.0,
            air_control: 0.8,
            coyote_time: 0.1,
            player_width: 90.0,
            player_height: 135.0,

            combo_start_threshold: 3,
            combo_speed_boost: 0.25,
            max_combo_levels: 10,
            combo_multiplier: 2.0,

            platform_thickness: 45.0,
            platform_width_large: 450.0,
            platform_width_medium: 300.0,
            platform_width_small: 180.0,
            platform_width_tiny: 120.0,
            min_platform_width: 90.0,
            min_platform_spacing_y: 140.0,
            max_platform_spacing_y: 220.0,

            ground_y: 150.0,
            ground_platforms: 5,
            seed_platforms: 20,
            lookahead_screens: 3.0,
            celebration_interval: 100,
            celebration_cap: 300,
            floor_easy: 10,
            floor_medium: 50,
            floor_hard: 100,
            prune_screens: 2.0,

            base_score_per_platform: 10,

            danger_start_height: -100.0,
            // 8 u/s at a 0.8 base pace, folded so the multiplier starts at 1
            rising_floor_speed: 6.4,
            danger_grace_period: 10.0,
            danger_score_floor: 100,
            danger_score_ramp: 0.15,
            danger_score_step: 500.0,
            danger_time_ramp: 0.2,
            danger_height_threshold: 500.0,
            danger_height_step: 2000.0,

            camera_smooth_speed: 8.0,
            camera_safe_zone_ratio: 0.33,
            camera_start_y: 200.0,
            camera_min_y: 100.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }
        fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be within 0..=1, got {value}"),
                })
            }
        }

        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("platform_thickness", self.platform_thickness)?;
        positive("min_platform_width", self.min_platform_width)?;
        positive("platform_width_large", self.platform_width_large)?;
        positive("platform_width_tiny", self.platform_width_tiny)?;
        positive("min_platform_spacing_y", self.min_platform_spacing_y)?;
        positive("max_horizontal_speed", self.max_horizontal_speed)?;
        positive("rising_floor_speed", self.rising_floor_speed)?;
        positive("danger_score_step", self.danger_score_step)?;
        positive("danger_height_step", self.danger_height_step)?;
        positive("friction_reference_hz", self.friction_reference_hz)?;
        unit("ground_friction", self.ground_friction)?;
        unit("air_friction", self.air_friction)?;
        unit("air_control", self.air_control)?;

        if self.gravity >= 0.0 {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "must pull downward (negative)".to_string(),
            });
        }
        if self.terminal_velocity >= 0.0 {
            return Err(TuningError::Invalid {
                field: "terminal_velocity",
                reason: "must be negative".to_string(),
            });
        }
        if self.max_platform_spacing_y < self.min_platform_spacing_y {
            return Err(TuningError::Invalid {
                field: "max_platform_spacing_y",
                reason: "must not be below min_platform_spacing_y".to_string(),
            });
        }
        if self.max_jump_height < self.base_jump_height {
            return Err(TuningError::Invalid {
                field: "max_jump_height",
                reason: "must not be below base_jump_height".to_string(),
            });
        }
        if !(self.floor_easy <= self.floor_medium && self.floor_medium <= self.floor_hard) {
            return Err(TuningError::Invalid {
                field: "floor_hard",
                reason: "tier thresholds must be ascending".to_string(),
            });
        }
        let widths = [
            self.platform_width_large,
            self.platform_width_medium,
            self.platform_width_small,
            self.platform_width_tiny,
        ];
        if widths.windows(2).any(|w| w[1] >= w[0]) {
            return Err(TuningError::Invalid {
                field: "platform_width_medium",
                reason: "tier widths must shrink strictly from large to tiny".to_string(),
            });
        }
        if !(self.combo_multiplier.is_finite() && self.combo_multiplier >= 1.0) {
            return Err(TuningError::Invalid {
                field: "combo_multiplier",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.celebration_interval == 0 {
            return Err(TuningError::Invalid {
                field: "celebration_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Player spawn: centred horizontally, standing on the ground row
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.world_width / 2.0 - self.player_width / 2.0,
            self.ground_y + self.platform_thickness,
        )
    }

    /// Camera safe zone half-height
    pub fn camera_safe_zone(&self) -> f32 {
        self.world_height * self.camera_safe_zone_ratio
    }

    pub fn tier_for_floor(&self, floor: u32) -> FloorTier {
        if floor <= self.floor_easy {
            FloorTier::Easy
        } else if floor <= self.floor_medium {
            FloorTier::Medium
        } else if floor <= self.floor_hard {
            FloorTier::Hard
        } else {
            FloorTier::Extreme
        }
    }

    /// Generation parameters for a tier. Widths shrink, spacing bands widen and
    /// special odds grow as the tier increases.
    pub fn tier_profile(&self, tier: FloorTier) -> TierProfile {
        let min = self.min_platform_spacing_y;
        let max = self.max_platform_spacing_y;
        match tier {
            FloorTier::Easy => TierProfile {
                base_width: self.platform_width_large,
                min_spacing_y: min,
                max_spacing_y: max,
                horizontal_gap_factor: 2.0,
                special_chance: 0.1,
            },
            FloorTier::Medium => TierProfile {
                base_width: self.platform_width_medium,
                min_spacing_y: min,
                max_spacing_y: max,
                horizontal_gap_factor: 2.0,
                special_chance: 0.2,
            },
            FloorTier::Hard => TierProfile {
                base_width: self.platform_width_small,
                min_spacing_y: min * 1.2,
                max_spacing_y: max * 1.3,
                horizontal_gap_factor: 3.0,
                special_chance: 0.3,
            },
            FloorTier::Extreme => TierProfile {
                base_width: self.platform_width_tiny,
                min_spacing_y: min * 1.2 * 1.3,
                max_spacing_y: max * 1.3 * 1.4,
                horizontal_gap_factor: 3.0,
                special_chance: 0.4,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [FloorTier; 4] = [
        FloorTier::Easy,
        FloorTier::Medium,
        FloorTier::Hard,
        FloorTier::Extreme,
    ];

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_player_start_matches_ground_row() {
        let t = Tuning::default();
        let start = t.player_start();
        assert_eq!(start, Vec2::new(1920.0 / 2.0 - 45.0, 195.0));
    }

    #[test]
    fn test_tier_thresholds() {
        let t = Tuning::default();
        assert_eq!(t.tier_for_floor(0), FloorTier::Easy);
        assert_eq!(t.tier_for_floor(10), FloorTier::Easy);
        assert_eq!(t.tier_for_floor(11), FloorTier::Medium);
        assert_eq!(t.tier_for_floor(50), FloorTier::Medium);
        assert_eq!(t.tier_for_floor(51), FloorTier::Hard);
        assert_eq!(t.tier_for_floor(101), FloorTier::Extreme);
    }

    #[test]
    fn test_tier_profiles_progress_monotonically() {
        let t = Tuning::default();
        for pair in TIERS.windows(2) {
            let easier = t.tier_profile(pair[0]);
            let harder = t.tier_profile(pair[1]);
            assert!(harder.base_width < easier.base_width);
            assert!(
                harder.max_spacing_y - harder.min_spacing_y
                    >= easier.max_spacing_y - easier.min_spacing_y
            );
            assert!(harder.special_chance >= easier.special_chance);
            assert!(harder.horizontal_gap_factor >= easier.horizontal_gap_factor);
        }
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "gravity": -900.0, "seed_platforms": 5 }"#).unwrap();
        assert_eq!(t.gravity, -900.0);
        assert_eq!(t.seed_platforms, 5);
        assert_eq!(t.world_width, 1920.0);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Tuning::from_json(r#"{ "gravity": 10.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gravity", .. }));

        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_inverted_spacing_rejected() {
        let t = Tuning {
            min_platform_spacing_y: 300.0,
            max_platform_spacing_y: 200.0,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_score_multiplier_below_one_rejected() {
        let t = Tuning {
            combo_multiplier: 0.5,
            ..Tuning::default()
        };
        let err = t.validate().unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "combo_multiplier", .. }));
    }

    #[test]
    fn test_tier_widths_must_shrink() {
        let t = Tuning {
            platform_width_small: 300.0,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());

        let err = Tuning::from_json(r#"{"platform_width_tiny": 500.0}"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }
}
