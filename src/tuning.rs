//! Game balance and arena tuning
//!
//! Everything the simulation needs that is not level-specific. Serialized as
//! JSON so a host can ship balance tweaks without a rebuild.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Arena width (x grows to the right, walls at 0 and width)
    pub arena_width: f32,
    /// Arena height (y grows upward, ceiling at height, shooter near 0)
    pub arena_height: f32,
    /// Launch position of every shot
    pub shooter: Vec2,
    /// A bubble attaching with its lowest point under this line loses the game
    pub danger_line_y: f32,

    // === Motion ===
    /// Shot speed, pixels per second
    pub shot_speed: f32,
    /// Velocity kept after bouncing off a wall or the ceiling
    pub wall_damping: f32,
    /// Downward acceleration for falling debris, pixels/s²
    pub gravity: f32,
    /// Aim is clamped to [min_aim_degrees, 180 - min_aim_degrees]
    pub min_aim_degrees: f32,

    // === Grid ===
    /// Neighbor threshold as a multiple of the level's grid spacing
    pub neighbor_tolerance: f32,

    // === Scoring ===
    /// Bonus paid when a shot strikes a golden bubble
    pub golden_bonus: u64,

    // === Enemies ===
    /// Hit radius of a flying enemy
    pub enemy_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 540.0,
            arena_height: 960.0,
            shooter: Vec2::new(270.0, 60.0),
            danger_line_y: 100.0,

            shot_speed: 600.0,
            wall_damping: 0.8,
            gravity: 900.0,
            min_aim_degrees: 8.0,

            neighbor_tolerance: 1.1,

            golden_bonus: 100,

            enemy_radius: 28.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: arena {}x{}, shot speed {}",
            tuning.arena_width,
            tuning.arena_height,
            tuning.shot_speed
        );
        Ok(tuning)
    }

    /// Serialize tuning to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp an aim angle so shots always travel toward the grid
    pub fn clamp_aim(&self, degrees: f32) -> f32 {
        degrees.clamp(self.min_aim_degrees, 180.0 - self.min_aim_degrees)
    }

    /// Whether a circle fits between the side walls and under the ceiling
    pub fn fits_in_arena(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= 0.0
            && pos.x + radius <= self.arena_width
            && pos.y + radius <= self.arena_height
    }
}
