//! Flying enemies
//!
//! Only the collision contract lives here: an enemy drifts across the arena
//! and reports when a shot touches it. Spawn timing and visuals belong to the
//! host. A struck enemy sets off a blast shaped by its kind.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::Bubble;
use super::geometry::overlaps;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Airplane,
    Helicopter,
    Warship,
}

/// Area cleared when an enemy is shot down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeShape {
    /// Circle like a dynamite blast
    Radius,
    /// Horizontal band like a mine
    Row,
}

impl EnemyKind {
    pub fn strike_shape(&self) -> StrikeShape {
        match self {
            EnemyKind::Airplane => StrikeShape::Radius,
            EnemyKind::Helicopter | EnemyKind::Warship => StrikeShape::Row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Whether a bubble touches this enemy
    pub fn check_collision(&self, bubble: &Bubble) -> bool {
        overlaps(self.pos, self.radius, bubble.pos, bubble.radius)
    }

    /// Flown completely out of the arena
    pub fn has_left(&self, tuning: &Tuning) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.x - self.radius > tuning.arena_width
            || self.pos.y + self.radius < 0.0
            || self.pos.y - self.radius > tuning.arena_height
    }
}
