//! Match detection - finding and popping same-element groups
//!
//! Depth-first flood fill over the live grid. Adjacency is geometric (centre
//! distance under the neighbor threshold) because the grid is sparse and
//! shots can come to rest off the canonical cells.

use std::collections::HashSet;

use super::bubble::{Bubble, Special};
use super::connectivity::finish_clear;
use super::explosion;
use super::geometry::are_neighbors;
use super::state::{ClearCause, GameState};
use crate::consts::MIN_MATCH;

/// All bubbles of the seed's element reachable from the seed
///
/// The seed is always first in the result. Empty if the seed is not in the grid.
pub fn find_connected_matches(grid: &[Bubble], seed_id: u32, neighbor_distance: f32) -> Vec<u32> {
    let Some(seed) = grid.iter().find(|b| b.id == seed_id) else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![seed];
    visited.insert(seed.id);

    while let Some(bubble) = stack.pop() {
        matches.push(bubble.id);
        for other in grid {
            if visited.contains(&other.id)
                || other.element != seed.element
                || !are_neighbors(bubble.pos, other.pos, neighbor_distance)
            {
                continue;
            }
            visited.insert(other.id);
            stack.push(other);
        }
    }

    matches
}

/// Pop the seed's group if it is large enough
///
/// Removal is two-phase: the group is collected first, then removed in one
/// pass. Dynamite and mines in the group go off only after the group is gone
/// and the grid has settled. Returns how many bubbles the match itself popped.
pub fn resolve_match(state: &mut GameState, seed_id: u32) -> usize {
    let group = find_connected_matches(&state.grid, seed_id, state.neighbor_distance());
    if group.len() < MIN_MATCH {
        return 0;
    }

    let removed = state.take_bubbles(&group);
    let payloads: Vec<(Special, glam::Vec2)> = removed
        .iter()
        .filter(|b| b.special.detonates())
        .map(|b| (b.special, b.pos))
        .collect();
    let count = removed.len();

    log::debug!(
        "Matched {} {:?} bubbles from #{} ({} payloads)",
        count,
        removed.first().map(|b| b.element),
        seed_id,
        payloads.len()
    );

    finish_clear(state, ClearCause::Match, &removed);
    explosion::detonate_all(state, &payloads);
    count
}
