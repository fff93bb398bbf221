//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{WallOutcome, find_contact, resolve_walls};
use super::explosion::strike_enemy;
use super::placement::attach_shot;
use super::state::{GameEvent, GamePhase, GameState};
use crate::cartesian_to_polar;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim angle in degrees (from mouse/touch position)
    pub aim_degrees: Option<f32>,
    /// Fire the loaded bubble (click/tap/space)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Won | GamePhase::Lost => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autoplay(state, &mut input);
    }

    state.time_ticks += 1;

    if let Some(aim) = input.aim_degrees {
        state.aim_degrees = state.tuning.clamp_aim(aim);
    }
    if input.fire {
        state.fire_shot();
    }

    // Enemies drift on their own; the host decides when they appear
    for enemy in &mut state.enemies {
        enemy.update(dt);
    }
    state.enemies.retain(|e| !e.has_left(&state.tuning));

    update_shots(state, dt);

    // Falling debris only needs to get off screen
    let gravity = state.tuning.gravity;
    for bubble in &mut state.falling {
        bubble.update(dt, gravity);
    }
    state.falling.retain(|b| b.pos.y + b.radius >= 0.0);

    state.check_loss();
    state.normalize_order();
}

/// Move every shot in flight and resolve what it runs into, one shot at a time
fn update_shots(state: &mut GameState, dt: f32) {
    let shots = std::mem::take(&mut state.shots);
    let gravity = state.tuning.gravity;

    for mut shot in shots {
        shot.update(dt, gravity);

        if resolve_walls(&mut shot, &state.tuning) == WallOutcome::Missed {
            log::debug!("Shot #{} left the arena", shot.id);
            state.events.push(GameEvent::ShotMissed { id: shot.id });
            continue;
        }

        if let Some(index) = state.enemies.iter().position(|e| e.check_collision(&shot)) {
            let enemy = state.enemies.remove(index);
            strike_enemy(state, &enemy);
            continue;
        }

        match find_contact(&shot, &state.grid).map(|b| b.id) {
            Some(reference_id) => {
                attach_shot(state, shot, reference_id);
            }
            None => state.shots.push(shot),
        }
    }
}

/// Aim at the lowest bubble matching the loaded one and fire when the lane is clear
fn autoplay(state: &GameState, input: &mut TickInput) {
    let Some(loaded) = &state.loaded else {
        return;
    };

    let lowest = |element_only: bool| {
        state
            .grid
            .iter()
            .filter(|b| !element_only || b.element == loaded.element)
            .min_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };

    if let Some(target) = lowest(true).or_else(|| lowest(false)) {
        let (_, theta) = cartesian_to_polar(target.pos - state.tuning.shooter);
        input.aim_degrees = Some(theta.to_degrees());
    }
    input.fire = state.shots.is_empty();
}
