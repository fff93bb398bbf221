//! Data-driven level descriptors
//!
//! One record per level: grid geometry, shot budget, starting shape and the
//! odds of special bubbles. `LevelConfig::for_level` is the built-in table.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_SPACING_FACTOR;
use crate::sim::{GridGeometry, Special};

/// Number of levels in the built-in table
pub const LEVEL_COUNT: u32 = 40;

/// Starting layout carved out of the rows × columns rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Every cell filled
    #[default]
    Full,
    /// Widest at the middle row, narrowing toward top and bottom
    Diamond,
    /// Four-row cycle: left, centre, right, full
    Wave,
    /// Diagonal stripes of full rows and half rows
    Stripes,
    /// Wide at top and bottom, pinched waist in the middle
    Hourglass,
    /// Concentric bands around the centre
    Spiral,
    /// Three-wide horizontal and vertical bars through the centre
    Cross,
    /// Rows shifting right every two rows, always overlapping the row above
    Staircase,
    /// Alternating partial rows that keep a connected spine
    Maze,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Full => "full",
            Shape::Diamond => "diamond",
            Shape::Wave => "wave",
            Shape::Stripes => "stripes",
            Shape::Hourglass => "hourglass",
            Shape::Spiral => "spiral",
            Shape::Cross => "cross",
            Shape::Staircase => "staircase",
            Shape::Maze => "maze",
        }
    }

    /// Whether the cell at (row, col) starts with a bubble
    pub fn should_place(&self, row: u32, col: u32, rows: u32, cols: u32) -> bool {
        let (row, col, rows, cols) = (row as i32, col as i32, rows as i32, cols as i32);
        let width = cols as f32;
        let center_row = rows / 2;
        let center_col = cols / 2;

        match self {
            Shape::Full => true,
            Shape::Diamond => {
                let from_center = (row - center_row).abs();
                let in_row = (cols - from_center).max(3);
                centered_span(col, cols, in_row)
            }
            Shape::Wave => match row % 4 {
                0 => (col as f32) < width * 0.6,
                1 => (col as f32) >= width * 0.2 && (col as f32) < width * 0.8,
                2 => (col as f32) >= width * 0.4,
                _ => true,
            },
            Shape::Stripes => match (row + col) % 3 {
                0 => true,
                1 => col < cols / 2,
                _ => col >= cols / 2,
            },
            Shape::Hourglass => {
                let from_center = (row - center_row).abs();
                let in_row = if from_center <= 2 {
                    (cols - 4).max(4)
                } else {
                    cols - from_center / 2
                };
                centered_span(col, cols, in_row.min(cols).max(3))
            }
            Shape::Spiral => {
                let row_dist = (row - center_row).abs() as f32;
                let col_dist = if row % 2 == 1 {
                    (col as f32 - 0.5 - center_col as f32).abs()
                } else {
                    (col - center_col).abs() as f32
                };
                let max_dist = row_dist.max(col_dist);
                let limit = center_row.min(center_col) as f32;
                let phase = (row_dist + col_dist) % 3.0;
                if phase == 0.0 {
                    max_dist <= limit + 2.0
                } else if phase == 1.0 {
                    (2.0..=limit + 1.0).contains(&max_dist)
                } else {
                    max_dist >= limit - 1.0
                }
            }
            Shape::Cross => (col - center_col).abs() <= 1 || (row - center_row).abs() <= 1,
            Shape::Staircase => {
                let shift = (row / 2) % (cols / 2).max(1);
                let in_row = (cols - row / 4).max(7);
                let mut start = shift;
                if start + in_row > cols {
                    start = cols - in_row;
                }
                let start = start.max(0);
                col >= start && col < start + in_row
            }
            Shape::Maze => {
                let spine = col >= center_col - 1 && col < center_col + 2;
                match row % 4 {
                    0 => true,
                    1 => (col as f32) < width * 0.6 || spine,
                    2 => (col as f32) >= width * 0.4 || spine,
                    _ => col < 3 || col >= cols - 3 || (col >= center_col - 2 && col < center_col + 2),
                }
            }
        }
    }
}

/// `count` cells centred in a row of `cols`
fn centered_span(col: i32, cols: i32, count: i32) -> bool {
    let start = (cols - count) / 2;
    col >= start && col < start + count
}

/// Probability of each special payload when a bubble is spawned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialOdds {
    pub dynamite: f32,
    pub mine: f32,
    pub golden: f32,
}

impl Default for SpecialOdds {
    fn default() -> Self {
        Self {
            dynamite: 0.04,
            mine: 0.02,
            golden: 0.03,
        }
    }
}

impl SpecialOdds {
    /// No special bubbles at all
    pub const NONE: Self = Self {
        dynamite: 0.0,
        mine: 0.0,
        golden: 0.0,
    };

    /// Draw a payload for a freshly spawned bubble
    pub fn roll(&self, rng: &mut impl Rng) -> Special {
        let roll: f32 = rng.random();
        if roll < self.dynamite {
            Special::Dynamite
        } else if roll < self.dynamite + self.mine {
            Special::Mine
        } else if roll < self.dynamite + self.mine + self.golden {
            Special::Golden
        } else {
            Special::None
        }
    }
}

/// Everything that distinguishes one level from another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub number: u32,
    pub name: String,
    pub geometry: GridGeometry,
    /// Rows and columns are only used to populate the starting grid
    pub rows: u32,
    pub columns: u32,
    pub max_shots: u32,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub special_odds: SpecialOdds,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            number: 1,
            name: "Level 1".to_string(),
            geometry: GridGeometry::default(),
            rows: 12,
            columns: 10,
            max_shots: 20,
            shape: Shape::Full,
            special_odds: SpecialOdds::default(),
        }
    }
}

impl LevelConfig {
    /// Built-in level table (numbers outside 1..=40 are clamped)
    pub fn for_level(number: u32) -> Self {
        let number = number.clamp(1, LEVEL_COUNT);

        let shape = match number {
            2 => Shape::Diamond,
            3 => Shape::Wave,
            4 => Shape::Stripes,
            5 => Shape::Hourglass,
            6 => Shape::Spiral,
            7 => Shape::Cross,
            8 => Shape::Staircase,
            9 => Shape::Maze,
            _ => Shape::Full,
        };

        let rows = match number {
            1 => 12,
            7 => 19,
            _ => 13,
        };

        let max_shots = match number {
            1 | 2 => 20,
            3 => 18,
            4 => 16,
            5 => 15,
            6 => 14,
            7 => 13,
            8 => 12,
            9 => 11,
            // Level 10 restarts at 18 shots and loses one per level down to 1
            10..=27 => 28 - number,
            _ => 1,
        };

        Self {
            number,
            name: format!("Level {number}"),
            rows,
            max_shots,
            shape,
            ..Self::default()
        }
    }

    /// Parse a level descriptor from JSON (normalized on the way in)
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Raise spacing so bubbles on neighboring cells can never overlap
    pub fn normalized(mut self) -> Self {
        let min_spacing = self.geometry.radius * MIN_SPACING_FACTOR;
        if self.geometry.spacing < min_spacing {
            log::warn!(
                "{}: spacing {} too small for radius {}, raised to {}",
                self.name,
                self.geometry.spacing,
                self.geometry.radius,
                min_spacing
            );
            self.geometry.spacing = min_spacing;
        }
        self
    }

    /// Dynamite blast size in bubble diameters; later levels get smaller blasts
    pub fn dynamite_radius_in_diameters(&self) -> f32 {
        match self.number {
            0..=3 => 5.0,
            4..=6 => 4.0,
            _ => 3.0,
        }
    }

    /// Dynamite blast radius in arena pixels
    pub fn dynamite_blast_radius(&self) -> f32 {
        self.dynamite_radius_in_diameters() * self.geometry.radius * 2.0
    }
}
