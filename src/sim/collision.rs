//! Player-vs-platform landing and player-vs-danger-floor death
//!
//! Stateless: both checks borrow the entities for the duration of one call.

use glam::Vec2;
use rand::Rng;

use super::danger_floor::DangerFloor;
use super::platform::{Platform, PlatformKind};
use super::player::Player;

/// How far the player's feet may sit below a platform top and still land
pub const LANDING_TOLERANCE_BELOW: f32 = 5.0;
/// How far above a platform top the player's feet may hover and still land
pub const LANDING_TOLERANCE_ABOVE: f32 = 10.0;

/// A fresh landing resolved this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub platform_id: u32,
    pub kind: PlatformKind,
}

/// Whether the player's feet are inside the landing band of `platform`
fn in_landing_band(player: &Player, platform: &Platform) -> bool {
    let feet = player.pos.y;
    let top = platform.top();
    player.bounds().overlaps_horizontally(platform.bounds())
        && player.vel.y <= 0.0
        && feet >= top - LANDING_TOLERANCE_BELOW
        && feet <= top + LANDING_TOLERANCE_ABOVE
}

/// Resolve at most one landing against the platforms, first match in slice order.
///
/// The player is snapped onto the platform top every frame it stands there, but
/// `land_on_platform` and the platform's landing response only run on a new
/// landing: arriving airborne, or stepping across onto a different platform.
/// Returns that fresh landing, if any. When nothing supports the player the
/// grounded flag is cleared.
pub fn check_platform_collisions<R: Rng>(
    player: &mut Player,
    platforms: &mut [Platform],
    rng: &mut R,
) -> Option<Landing> {
    let Some(platform) = platforms.iter_mut().find(|p| in_landing_band(player, p)) else {
        player.leave_ground();
        return None;
    };

    // A grounded player with no recorded support (fresh spawn) adopts it silently
    let arriving = !player.is_on_ground()
        || player.standing_on().is_some_and(|id| id != platform.id);
    player.set_position(Vec2::new(player.pos.x, platform.top()));
    player.set_standing_on(platform.id);

    if !arriving {
        return None;
    }

    player.land_on_platform();
    platform.on_player_landed(player, rng);
    Some(Landing {
        platform_id: platform.id,
        kind: platform.kind(),
    })
}

/// True once the player's head has dropped below the danger line
pub fn check_danger_floor_collision(player: &Player, danger_floor: &DangerFloor) -> bool {
    player.bounds().top() < danger_floor.height()
}
