//! Collision detection and response for shots
//!
//! Shots bounce off the side walls and the ceiling with damping, leave the
//! arena through the floor, and stop on the first grid bubble they touch.

use glam::Vec2;

use super::bubble::Bubble;
use super::geometry::distance;
use crate::tuning::Tuning;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing back into the arena)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// What happened to a shot at the arena boundary this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallOutcome {
    /// Still inside, no boundary touched
    Clear,
    /// Bounced off a side wall or the ceiling
    Bounced,
    /// Dropped out through the shooter side
    Missed,
}

/// Check a circle against the left wall, right wall and ceiling
///
/// Side walls take precedence; a corner hit resolves the ceiling next tick.
pub fn bubble_wall_collision(pos: Vec2, radius: f32, tuning: &Tuning) -> CollisionResult {
    if pos.x - radius < 0.0 {
        return CollisionResult::hit(Vec2::X, radius - pos.x);
    }
    if pos.x + radius > tuning.arena_width {
        return CollisionResult::hit(-Vec2::X, pos.x + radius - tuning.arena_width);
    }
    if pos.y + radius > tuning.arena_height {
        return CollisionResult::hit(-Vec2::Y, pos.y + radius - tuning.arena_height);
    }
    CollisionResult::miss()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect velocity, keeping only `damping` of the normal component
///
/// Velocity already leaving the surface is returned unchanged.
pub fn damped_reflect(velocity: Vec2, normal: Vec2, damping: f32) -> Vec2 {
    let into_surface = velocity.dot(normal);
    if into_surface >= 0.0 {
        return velocity;
    }
    let reflected = reflect_velocity(velocity, normal);
    reflected - (1.0 - damping) * reflected.dot(normal) * normal
}

/// Whether a shot has fully left the arena through the shooter side
#[inline]
pub fn left_through_floor(pos: Vec2, radius: f32) -> bool {
    pos.y + radius < 0.0
}

/// Push a shot back inside the arena and bounce it, or report that it left
pub fn resolve_walls(shot: &mut Bubble, tuning: &Tuning) -> WallOutcome {
    if left_through_floor(shot.pos, shot.radius) {
        return WallOutcome::Missed;
    }

    let result = bubble_wall_collision(shot.pos, shot.radius, tuning);
    if !result.hit {
        return WallOutcome::Clear;
    }

    shot.pos += result.normal * result.penetration;
    shot.vel = damped_reflect(shot.vel, result.normal, tuning.wall_damping);
    WallOutcome::Bounced
}

/// Closest attached bubble that the shot overlaps, if any
pub fn find_contact<'a>(shot: &Bubble, grid: &'a [Bubble]) -> Option<&'a Bubble> {
    grid.iter()
        .filter(|b| b.is_attached())
        .map(|b| (b, distance(shot.pos, b.pos)))
        .filter(|(b, d)| *d < shot.radius + b.radius)
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(b, _)| b)
}
