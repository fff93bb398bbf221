//! Bubble Arena - a hex-grid bubble shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, matching, pruning, explosions)
//! - `level`: Data-driven level table
//! - `tuning`: Data-driven game balance
//! - `highscores`: Finished-game results leaderboard

pub mod highscores;
pub mod level;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use level::{LevelConfig, Shape};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz keeps shots from tunnelling)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Smallest same-element group that pops
    pub const MIN_MATCH: usize = 3;

    /// Vertical distance between hex rows, as a fraction of spacing (sqrt(3)/2)
    pub const ROW_PITCH: f32 = 0.866_025_4;
    /// Spacing is raised to at least this many radii when a level is loaded
    pub const MIN_SPACING_FACTOR: f32 = 2.1;

    /// Ring radii (multiples of spacing) scanned by the radial placement fallback
    pub const RADIAL_RINGS: [f32; 2] = [1.5, 2.0];
    /// Angular step of the radial placement fallback, degrees
    pub const RADIAL_STEP_DEGREES: usize = 30;

    /// Bubbles this close below the anchor line (multiples of spacing) hold the grid up
    pub const TOP_BAND: f32 = 0.5;
    /// Half-height of a mine's row blast (multiples of spacing)
    pub const MINE_BAND: f32 = 0.4;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Unit vector for an aim angle in degrees (0 = right, 90 = straight up)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    polar_to_cartesian(1.0, degrees.to_radians())
}
