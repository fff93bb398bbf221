//! Placement resolver
//!
//! Turns a shot that touched the grid into an attached bubble without ever
//! letting two attached bubbles overlap. Candidates are tried in order: the
//! six hex neighbors of the struck bubble (closest to the contact point wins),
//! the grid cell under the struck bubble, then two rings of radial
//! alternatives. A shot with nowhere to go is discarded.

use glam::Vec2;

use super::bubble::Bubble;
use super::explosion::golden_hit;
use super::geometry::{GridGeometry, distance, hex_neighbor_offsets, overlaps, snap_to_grid_cell};
use super::matching::resolve_match;
use super::state::{GameEvent, GameState};
use crate::consts::{RADIAL_RINGS, RADIAL_STEP_DEGREES};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// A slot is valid if it overlaps nothing attached and lies inside the arena
pub fn is_valid_slot(grid: &[Bubble], pos: Vec2, radius: f32, tuning: &Tuning) -> bool {
    tuning.fits_in_arena(pos, radius)
        && !grid.iter().any(|b| overlaps(pos, radius, b.pos, b.radius))
}

/// Resting position for `shot` after touching `reference`, if one exists
pub fn resolve_placement(
    grid: &[Bubble],
    shot: &Bubble,
    reference: &Bubble,
    geometry: &GridGeometry,
    tuning: &Tuning,
) -> Option<Vec2> {
    let valid = |pos: Vec2| is_valid_slot(grid, pos, shot.radius, tuning);

    let neighbor = hex_neighbor_offsets(geometry.spacing)
        .into_iter()
        .map(|offset| reference.pos + offset)
        .filter(|&pos| valid(pos))
        .map(|pos| (pos, distance(pos, shot.pos)))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((pos, _)) = neighbor {
        return Some(pos);
    }

    let snapped = snap_to_grid_cell(reference.pos, geometry.origin(), geometry.spacing);
    if valid(snapped) {
        return Some(snapped);
    }

    radial_candidates(reference.pos, geometry.spacing).find(|&pos| valid(pos))
}

/// Ring positions around `center`, innermost ring first, then by angle
fn radial_candidates(center: Vec2, spacing: f32) -> impl Iterator<Item = Vec2> {
    RADIAL_RINGS.into_iter().flat_map(move |ring| {
        (0..360).step_by(RADIAL_STEP_DEGREES).map(move |degrees| {
            center + polar_to_cartesian(ring * spacing, (degrees as f32).to_radians())
        })
    })
}

/// Attach a shot that touched `reference_id`, then resolve the match it makes
///
/// Returns the id of the placed bubble, or `None` if the shot was discarded.
pub fn attach_shot(state: &mut GameState, mut shot: Bubble, reference_id: u32) -> Option<u32> {
    golden_hit(state, reference_id);

    let reference = state.bubble(reference_id)?;
    let Some(pos) = resolve_placement(
        &state.grid,
        &shot,
        reference,
        &state.level.geometry,
        &state.tuning,
    ) else {
        log::debug!(
            "No free slot near #{} for shot #{} at {:?}, discarding",
            reference_id,
            shot.id,
            shot.pos
        );
        state.events.push(GameEvent::ShotDiscarded { id: shot.id });
        return None;
    };

    let id = shot.id;
    shot.attach_at(pos);
    state.attach(shot);
    state.events.push(GameEvent::BubblePlaced { id, pos });

    resolve_match(state, id);
    Some(id)
}
