//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within a tick the
//! order is fixed: input, player physics, danger floor, generation, platform
//! updates, collision, death check, score, camera, pruning.

use super::collision::{check_danger_floor_collision, check_platform_collisions};
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Jump (just pressed)
    pub jump: bool,
    /// Pause toggle (just pressed)
    pub pause: bool,
    /// Restart after game over or from pause (just pressed)
    pub restart: bool,
    /// Back to menu (just pressed)
    pub menu: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.menu {
        state.push_event(GameEvent::ReturnToMenu);
        return;
    }

    if input.restart && matches!(state.phase, GamePhase::GameOver | GamePhase::Paused) {
        state.restart();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.push_event(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    state.game_time += dt;

    if input.left {
        state.player.move_left(dt);
    }
    if input.right {
        state.player.move_right(dt);
    }
    if input.jump && state.player.jump() {
        let combo = state.player.combo_count();
        state.push_event(GameEvent::Jumped { combo });
    }

    state.player.update(dt);

    state.danger_floor.update(
        dt,
        state.score.score(),
        state.game_time,
        state.player.pos.y,
    );

    // Generate before updating so fresh platforms get this frame's update too
    let floor_before = state.generator.current_floor();
    state.generator.update(state.player.pos.y, &mut state.rng);
    for floor in floor_before + 1..=state.generator.current_floor() {
        if state.generator.is_celebration_floor(floor) {
            state.push_event(GameEvent::CelebrationFloor { floor });
        }
    }

    for platform in state.generator.platforms_mut() {
        platform.update(dt);
    }

    if let Some(landing) = check_platform_collisions(
        &mut state.player,
        state.generator.platforms_mut(),
        &mut state.rng,
    ) {
        state.push_event(GameEvent::Landed {
            platform_id: landing.platform_id,
            kind: landing.kind,
        });
    }

    if check_danger_floor_collision(&state.player, &state.danger_floor) {
        let score = state.score.score();
        let floor = state.generator.current_floor();
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score, floor });
        log::info!(
            "Game over: score {score}, floor {floor}, {:.1}s",
            state.game_time
        );
        return;
    }

    // Scores the post-snap position
    state.score.update(&state.player);
    state.camera.update(&state.player, dt);

    // Anchored on spawn height so hidden or falling respawnables survive
    let prune_below =
        state.player.pos.y - state.tuning.prune_screens * state.tuning.world_height;
    state
        .generator
        .remove_platforms(|p| p.should_remove() || p.original_pos().y < prune_below);
}

/// Steer toward the lowest reachable platform above and jump at it
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let t = &state.tuning;
    let feet = player.pos.y;
    let center_x = player.pos.x + player.width() / 2.0;

    // Full-momentum jump plus an air jump from its apex
    let g = t.gravity.abs().max(1.0);
    let reach = (t.max_jump_height * t.max_jump_height
        + t.base_jump_height * t.base_jump_height)
        / (2.0 * g);

    let target = state
        .generator
        .platforms()
        .iter()
        .filter(|p| !p.is_hidden() && p.top() > feet + 1.0 && p.top() < feet + reach)
        .min_by(|a, b| {
            let cost_a = a.top() - feet + (a.pos().x + a.width() / 2.0 - center_x).abs() * 0.25;
            let cost_b = b.top() - feet + (b.pos().x + b.width() / 2.0 - center_x).abs() * 0.25;
            cost_a
                .partial_cmp(&cost_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let (goal_x, slack, goal_top) = match target {
        Some(p) => (p.pos().x + p.width() / 2.0, p.width() / 4.0, Some(p.top())),
        None => (t.world_width / 2.0, t.world_width / 8.0, None),
    };

    let dx = goal_x - center_x;
    input.left = dx < -slack;
    input.right = dx > slack;

    input.jump = if player.is_on_ground() {
        true
    } else {
        // Spend the air jump on the way down if still short of the target
        player.vel.y <= 0.0 && player.has_air_jump() && goal_top.is_some_and(|top| feet < top)
    };
}
