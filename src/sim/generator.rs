//! Procedural platform stream
//!
//! A forward cursor (`last_x`, `last_y`) walks upward, dropping one platform
//! per floor. Difficulty follows the floor counter through the tuning's tiers,
//! and every `celebration_interval` floors a full-width bouncy row is laid
//! instead of a single platform.

use glam::Vec2;
use rand::Rng;

use super::platform::{Platform, PlatformKind};
use crate::tuning::Tuning;

/// Relative odds of each special variant once a platform rolls "special"
const SPECIAL_WEIGHTS: [(PlatformKind, u32); 5] = [
    (PlatformKind::Bouncy, 25),
    (PlatformKind::Moving, 20),
    (PlatformKind::Breakable, 20),
    (PlatformKind::Icy, 20),
    (PlatformKind::Falling, 15),
];

/// Width jitter applied to each generated platform (fraction of base width)
const WIDTH_JITTER: f32 = 0.2;
/// Extra vertical room before a celebration floor, in minimum spacings
const CELEBRATION_SPACING: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct PlatformGenerator {
    /// Live platforms in insertion order
    platforms: Vec<Platform>,
    last_x: f32,
    last_y: f32,
    current_floor: u32,
    next_id: u32,
    tuning: Tuning,
}

impl PlatformGenerator {
    /// Create the generator and lay the starting base plus seed platforms
    pub fn new<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let mut generator = Self {
            platforms: Vec::new(),
            last_x: tuning.world_width / 2.0,
            last_y: tuning.ground_y,
            current_floor: 0,
            next_id: 1,
            tuning: *tuning,
        };
        generator.seed_platforms(rng);
        generator
    }

    /// Clear everything and reseed
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.platforms.clear();
        self.current_floor = 0;
        self.seed_platforms(rng);
    }

    fn seed_platforms<R: Rng>(&mut self, rng: &mut R) {
        let t = self.tuning;

        // Wide base row, centred
        let width = t.platform_width_large;
        let total_width = t.ground_platforms as f32 * width;
        let start_x = (t.world_width - total_width) / 2.0;
        for i in 0..t.ground_platforms {
            let pos = Vec2::new(start_x + i as f32 * width, t.ground_y);
            self.push(pos, PlatformKind::Normal, width);
        }

        self.last_y = t.ground_y + t.min_platform_spacing_y;
        self.last_x = t.world_width / 2.0;
        self.current_floor = 0;

        // Freebies: these do not count as floors
        for _ in 0..t.seed_platforms {
            self.generate_platform(rng, false);
        }
        log::debug!(
            "Seeded {} platforms, cursor at y={}",
            self.platforms.len(),
            self.last_y
        );
    }

    /// Keep the stream filled up to the lookahead distance above the player
    pub fn update<R: Rng>(&mut self, player_y: f32, rng: &mut R) {
        let target = player_y + self.tuning.world_height * self.tuning.lookahead_screens;
        // Each step raises the cursor by at least the minimum spacing, so this terminates
        while self.highest_platform_y() < target {
            let next_floor = self.current_floor + 1;
            if self.is_celebration_floor(next_floor) {
                self.generate_celebration_floor();
            } else {
                self.generate_platform(rng, true);
            }
        }
    }

    /// Whether `floor` gets a full-width bouncy row
    pub fn is_celebration_floor(&self, floor: u32) -> bool {
        let t = &self.tuning;
        floor > 0 && floor % t.celebration_interval == 0 && floor <= t.celebration_cap
    }

    fn generate_platform<R: Rng>(&mut self, rng: &mut R, counts_as_floor: bool) {
        if counts_as_floor {
            self.current_floor += 1;
        }
        let t = self.tuning;
        let profile = t.tier_profile(t.tier_for_floor(self.current_floor));

        let jitter = rng.random_range(-WIDTH_JITTER..=WIDTH_JITTER);
        let width = (profile.base_width * (1.0 + jitter))
            .max(t.min_platform_width)
            .min(t.world_width);

        let spacing_y = rng.random_range(profile.min_spacing_y..=profile.max_spacing_y);

        let max_gap = width * profile.horizontal_gap_factor;
        let spacing_x = rng.random_range(-max_gap..=max_gap);

        self.last_y += spacing_y;
        self.last_x = (self.last_x + spacing_x).clamp(0.0, t.world_width - width);

        let kind = Self::pick_kind(profile.special_chance, rng);
        self.push(Vec2::new(self.last_x, self.last_y), kind, width);
    }

    fn pick_kind<R: Rng>(special_chance: f32, rng: &mut R) -> PlatformKind {
        if rng.random::<f32>() >= special_chance {
            return PlatformKind::Normal;
        }
        let total: u32 = SPECIAL_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for (kind, weight) in SPECIAL_WEIGHTS {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PlatformKind::Normal
    }

    fn generate_celebration_floor(&mut self) {
        self.current_floor += 1;
        log::info!("Creating celebration floor {}!", self.current_floor);

        let t = self.tuning;
        self.last_y += t.min_platform_spacing_y * CELEBRATION_SPACING;

        // Gap-free row; the last piece is trimmed to end exactly at the wall
        let width = t.platform_width_large;
        let count = (t.world_width / width).ceil() as u32;
        for i in 0..count {
            let x = i as f32 * width;
            let piece = width.min(t.world_width - x);
            if piece > 0.0 {
                self.push(Vec2::new(x, self.last_y), PlatformKind::Bouncy, piece);
            }
        }

        self.last_x = t.world_width / 2.0;
    }

    fn push(&mut self, pos: Vec2, kind: PlatformKind, width: f32) {
        let id = self.next_id;
        self.next_id += 1;
        self.platforms.push(Platform::new(
            id,
            pos,
            kind,
            width,
            self.tuning.platform_thickness,
        ));
    }

    /// Drop every platform matching the predicate. Returns how many went.
    pub fn remove_platforms<F>(&mut self, mut should_remove: F) -> usize
    where
        F: FnMut(&Platform) -> bool,
    {
        let before = self.platforms.len();
        self.platforms.retain(|p| !should_remove(p));
        let removed = before - self.platforms.len();
        if removed > 0 {
            log::debug!("Pruned {} platforms, {} live", removed, self.platforms.len());
        }
        removed
    }

    /// Y of the highest live platform
    pub fn highest_platform_y(&self) -> f32 {
        self.platforms
            .iter()
            .map(|p| p.pos().y)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platforms_mut(&mut self) -> &mut [Platform] {
        &mut self.platforms
    }

    pub fn current_floor(&self) -> u32 {
        self.current_floor
    }

    /// Position of the spawn cursor
    pub fn cursor(&self) -> Vec2 {
        Vec2::new(self.last_x, self.last_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn generator(seed: u64) -> (PlatformGenerator, Pcg32, Tuning) {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let g = PlatformGenerator::new(&t, &mut rng);
        (g, rng, t)
    }

    #[test]
    fn test_fresh_generator_layout() {
        let (g, _, t) = generator(12345);
        assert_eq!(g.current_floor(), 0);
        assert_eq!(g.platforms().len(), 25);

        let ground: Vec<_> = g
            .platforms()
            .iter()
            .filter(|p| p.pos().y == t.ground_y)
            .collect();
        assert_eq!(ground.len(), 5);
        assert!(ground.iter().all(|p| p.kind() == PlatformKind::Normal));
        assert!(ground.iter().all(|p| p.width() == t.platform_width_large));

        let above = g.platforms().iter().filter(|p| p.pos().y > t.ground_y).count();
        assert_eq!(above, 20);
    }

    #[test]
    fn test_ground_row_is_contiguous_and_centred() {
        let (g, _, t) = generator(1);
        let ground = &g.platforms()[..5];
        for pair in ground.windows(2) {
            assert_eq!(pair[0].bounds().right(), pair[1].bounds().left());
        }
        let mid = (ground[0].bounds().left() + ground[4].bounds().right()) / 2.0;
        assert!((mid - t.world_width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_platforms_stay_inside_world() {
        let (mut g, mut rng, t) = generator(777);
        g.update(30_000.0, &mut rng);
        for p in &g.platforms()[5..] {
            assert!(p.bounds().left() >= 0.0);
            assert!(p.bounds().right() <= t.world_width + 1e-3);
            assert!(p.width() >= t.min_platform_width);
        }
    }

    #[test]
    fn test_update_fills_lookahead() {
        let (mut g, mut rng, t) = generator(99);
        let player_y = 5000.0;
        g.update(player_y, &mut rng);
        assert!(g.highest_platform_y() >= player_y + t.world_height * t.lookahead_screens);
        assert!(g.current_floor() > 0);
    }

    #[test]
    fn test_update_is_idempotent_when_full() {
        let (mut g, mut rng, _) = generator(5);
        g.update(1000.0, &mut rng);
        let count = g.platforms().len();
        let floor = g.current_floor();
        g.update(1000.0, &mut rng);
        assert_eq!(g.platforms().len(), count);
        assert_eq!(g.current_floor(), floor);
    }

    #[test]
    fn test_celebration_floor_is_full_width_bouncy() {
        let (mut g, mut rng, t) = generator(2024);
        // Climb until floor 100 has been laid
        let mut player_y = 0.0;
        while g.current_floor() < 100 {
            player_y += 500.0;
            g.update(player_y, &mut rng);
        }

        let mut rows: std::collections::BTreeMap<i64, Vec<&Platform>> = Default::default();
        for p in g.platforms().iter().filter(|p| p.kind() == PlatformKind::Bouncy) {
            rows.entry(p.pos().y as i64).or_default().push(p);
        }
        let row = rows
            .values()
            .find(|row| row.len() >= 5)
            .expect("celebration row present");
        assert_eq!(row[0].bounds().left(), 0.0);
        for pair in row.windows(2) {
            assert_eq!(pair[0].bounds().right(), pair[1].bounds().left());
        }
        assert!((row.last().unwrap().bounds().right() - t.world_width).abs() < 1e-3);
    }

    #[test]
    fn test_celebration_schedule() {
        let (g, _, _) = generator(1);
        assert!(!g.is_celebration_floor(0));
        assert!(!g.is_celebration_floor(99));
        assert!(g.is_celebration_floor(100));
        assert!(g.is_celebration_floor(300));
        assert!(!g.is_celebration_floor(400));
    }

    #[test]
    fn test_special_mix_uses_every_variant() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(PlatformGenerator::pick_kind(1.0, &mut rng));
        }
        assert!(!seen.contains(&PlatformKind::Normal));
        assert_eq!(seen.len(), 5);

        for _ in 0..100 {
            assert_eq!(PlatformGenerator::pick_kind(0.0, &mut rng), PlatformKind::Normal);
        }
    }

    #[test]
    fn test_remove_platforms_by_predicate() {
        let (mut g, _, t) = generator(8);
        let removed = g.remove_platforms(|p| p.pos().y == t.ground_y);
        assert_eq!(removed, 5);
        assert_eq!(g.platforms().len(), 20);
        assert!(g.platforms().iter().all(|p| p.pos().y > t.ground_y));

        // Adjacent matches are all removed, none skipped
        let removed = g.remove_platforms(|_| true);
        assert_eq!(removed, 20);
        assert!(g.platforms().is_empty());
    }

    #[test]
    fn test_reset_reseeds() {
        let (mut g, mut rng, _) = generator(11);
        g.update(20_000.0, &mut rng);
        assert!(g.current_floor() > 0);
        g.reset(&mut rng);
        assert_eq!(g.current_floor(), 0);
        assert_eq!(g.platforms().len(), 25);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let (mut a, mut rng_a, _) = generator(4242);
        let (mut b, mut rng_b, _) = generator(4242);
        a.update(10_000.0, &mut rng_a);
        b.update(10_000.0, &mut rng_b);
        assert_eq!(a.platforms().len(), b.platforms().len());
        for (pa, pb) in a.platforms().iter().zip(b.platforms()) {
            assert_eq!(pa.pos(), pb.pos());
            assert_eq!(pa.kind(), pb.kind());
        }
    }

    proptest! {
        #[test]
        fn prop_floor_counter_monotonic(seed in any::<u64>(), climbs in prop::collection::vec(0.0f32..3000.0, 1..20)) {
            let t = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut g = PlatformGenerator::new(&t, &mut rng);
            prop_assert_eq!(g.current_floor(), 0);
            let mut player_y = 0.0;
            let mut last = 0;
            for climb in climbs {
                player_y += climb;
                g.update(player_y, &mut rng);
                prop_assert!(g.current_floor() >= last);
                last = g.current_floor();
            }
        }
    }
}
