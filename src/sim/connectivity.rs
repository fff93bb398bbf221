//! Floating-bubble detection
//!
//! Bubbles hang from the top row. After anything leaves the grid, every
//! bubble with no neighbor path to the top row is removed and scored like any
//! other clear, then dropped as falling debris.

use std::collections::{HashSet, VecDeque};

use super::bubble::Bubble;
use super::geometry::are_neighbors;
use super::state::{ClearCause, GameEvent, GameState};

/// Bubbles holding the grid up: on or above the top band line
pub fn top_bubbles(grid: &[Bubble], top_band_y: f32) -> Vec<u32> {
    grid.iter()
        .filter(|b| b.pos.y >= top_band_y)
        .map(|b| b.id)
        .collect()
}

/// Ids of every bubble connected to the top row (element is ignored)
pub fn find_supported(grid: &[Bubble], top_band_y: f32, neighbor_distance: f32) -> HashSet<u32> {
    let mut supported = HashSet::new();
    let mut queue = VecDeque::new();

    for bubble in grid.iter().filter(|b| b.pos.y >= top_band_y) {
        supported.insert(bubble.id);
        queue.push_back(bubble);
    }

    while let Some(bubble) = queue.pop_front() {
        for other in grid {
            if !supported.contains(&other.id)
                && are_neighbors(bubble.pos, other.pos, neighbor_distance)
            {
                supported.insert(other.id);
                queue.push_back(other);
            }
        }
    }

    supported
}

/// Bubbles with no path to the top row
pub fn find_floating(grid: &[Bubble], top_band_y: f32, neighbor_distance: f32) -> Vec<u32> {
    let supported = find_supported(grid, top_band_y, neighbor_distance);
    grid.iter()
        .filter(|b| !supported.contains(&b.id))
        .map(|b| b.id)
        .collect()
}

/// Remove and score every floating bubble, then check for a win
///
/// With no top-row bubbles left the whole grid goes at once (a grid wipe).
/// Returns the number of bubbles removed.
pub fn prune_disconnected(state: &mut GameState) -> usize {
    if state.grid.is_empty() {
        state.check_win();
        return 0;
    }

    let top_band_y = state.top_band_y();
    let (cause, floating) = if top_bubbles(&state.grid, top_band_y).is_empty() {
        let all: Vec<u32> = state.grid.iter().map(|b| b.id).collect();
        (ClearCause::GridWipe, all)
    } else {
        let floating = find_floating(&state.grid, top_band_y, state.neighbor_distance());
        (ClearCause::Disconnect, floating)
    };

    let removed = state.take_bubbles(&floating);
    let count = removed.len();
    if count > 0 {
        let points = state.award(count);
        log::debug!("{:?}: {} bubbles fell for {} points", cause, count, points);
        state.events.push(GameEvent::Cleared {
            cause,
            count,
            points,
        });
        state.drop_bubbles(removed);
    }

    state.check_win();
    count
}

/// Shared tail of every clearing path: score, prune, then check for a win
///
/// The win check happens inside the prune. Nothing happens if nothing was removed.
pub fn finish_clear(state: &mut GameState, cause: ClearCause, removed: &[Bubble]) {
    if removed.is_empty() {
        return;
    }
    let count = removed.len();
    let points = state.award(count);
    state.events.push(GameEvent::Cleared {
        cause,
        count,
        points,
    });
    prune_disconnected(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelConfig, SpecialOdds};
    use crate::sim::bubble::{BubbleState, Element, Special};
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn empty_state() -> GameState {
        let level = LevelConfig {
            special_odds: SpecialOdds::NONE,
            ..LevelConfig::for_level(1)
        };
        GameState::empty(level, Tuning::default(), 5)
    }

    fn put(state: &mut GameState, row: i32, col: i32) -> u32 {
        let pos = state.level.geometry.cell_center(row, col);
        let element = Element::ALL[(row + col).rem_euclid(4) as usize];
        state
            .insert_attached(pos, element, Special::None)
            .unwrap_or_else(|| panic!("cell ({row},{col}) occupied"))
    }

    #[test]
    fn test_hanging_chain_is_supported() {
        let mut state = empty_state();
        let top = put(&mut state, 0, 2);
        let mid = put(&mut state, 1, 2);
        let low = put(&mut state, 2, 3);
        let supported = find_supported(&state.grid, state.top_band_y(), state.neighbor_distance());
        assert_eq!(supported, HashSet::from([top, mid, low]));
    }

    #[test]
    fn test_island_is_pruned_and_scored() {
        let mut state = empty_state();
        put(&mut state, 0, 0);
        put(&mut state, 1, 0);
        let island_a = put(&mut state, 3, 6);
        let island_b = put(&mut state, 3, 7);

        let removed = prune_disconnected(&mut state);
        assert_eq!(removed, 2);
        assert_eq!(state.grid.len(), 2);
        assert!(state.bubble(island_a).is_none() && state.bubble(island_b).is_none());
        assert_eq!(state.score, 2 * state.shots_remaining as u64);
        assert_eq!(state.falling.len(), 2);
        assert!(state.falling.iter().all(|b| b.state == BubbleState::Falling));
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let mut state = empty_state();
        put(&mut state, 0, 0);
        put(&mut state, 1, 0);
        put(&mut state, 4, 4);
        prune_disconnected(&mut state);
        let score = state.score;
        assert_eq!(prune_disconnected(&mut state), 0);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_grid_wipe_without_top_row() {
        let mut state = empty_state();
        let top_a = put(&mut state, 0, 3);
        let top_b = put(&mut state, 0, 4);
        put(&mut state, 1, 3);
        put(&mut state, 2, 3);
        put(&mut state, 2, 4);

        // Knock out the top row directly
        state.take_bubbles(&[top_a, top_b]);
        let removed = prune_disconnected(&mut state);

        assert_eq!(removed, 3);
        assert!(state.grid.is_empty());
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&GameEvent::Cleared {
            cause: ClearCause::GridWipe,
            count: 3,
            points: 3 * state.shots_remaining as u64,
        }));
    }

    #[test]
    fn test_finish_clear_ignores_empty_removal() {
        let mut state = empty_state();
        put(&mut state, 0, 0);
        put(&mut state, 3, 5);
        finish_clear(&mut state, ClearCause::Dynamite, &[]);
        assert!(state.events.is_empty());
        assert_eq!(state.grid.len(), 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bubble_against_ceiling_counts_as_top() {
        let mut state = empty_state();
        let above = put(&mut state, -1, 2);
        assert_eq!(top_bubbles(&state.grid, state.top_band_y()), vec![above]);
        assert_eq!(prune_disconnected(&mut state), 0);
    }
}
