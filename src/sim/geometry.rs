//! Hex-grid geometry
//!
//! Pure helpers shared by placement, matching and pruning. The grid uses
//! "odd-r" offset rows: row 0 sits on the anchor line at `start_y`, rows grow
//! downward by `spacing * sqrt(3)/2`, and odd rows shift right by half a
//! spacing. With that pitch all six neighbors of a cell are exactly
//! `spacing` away, at 0°, 60°, ..., 300°.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ROW_PITCH;
use crate::polar_to_cartesian;

/// Geometric parameters of a level's grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Radius shared by every bubble in the session
    pub radius: f32,
    /// Distance between adjacent bubble centres (>= 2 * radius)
    pub spacing: f32,
    /// Centre x of column 0 on even rows
    pub start_x: f32,
    /// Centre y of row 0 (the anchor line)
    pub start_y: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            radius: 20.0,
            spacing: 45.0,
            start_x: 50.0,
            start_y: 900.0,
        }
    }
}

impl GridGeometry {
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    /// Vertical distance between rows
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.spacing * ROW_PITCH
    }

    /// Centre-to-centre distance under which two bubbles count as neighbors
    #[inline]
    pub fn neighbor_distance(&self, tolerance: f32) -> f32 {
        self.spacing * tolerance
    }

    /// Canonical centre of a cell
    pub fn cell_center(&self, row: i32, col: i32) -> Vec2 {
        cell_center(row, col, self.origin(), self.spacing)
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True when two circles overlap; touching is allowed
#[inline]
pub fn overlaps(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) < a_radius + b_radius
}

/// True when two centres are within neighbor range
#[inline]
pub fn are_neighbors(a: Vec2, b: Vec2, neighbor_distance: f32) -> bool {
    distance(a, b) < neighbor_distance
}

/// Offsets to the six adjacent cells, counter-clockwise from 0°
pub fn hex_neighbor_offsets(spacing: f32) -> [Vec2; 6] {
    let mut offsets = [Vec2::ZERO; 6];
    for (i, offset) in offsets.iter_mut().enumerate() {
        *offset = polar_to_cartesian(spacing, (60.0 * i as f32).to_radians());
    }
    offsets
}

/// Centre of the cell at (row, col)
pub fn cell_center(row: i32, col: i32, origin: Vec2, spacing: f32) -> Vec2 {
    let shift = if row.rem_euclid(2) == 1 { spacing * 0.5 } else { 0.0 };
    Vec2::new(
        origin.x + col as f32 * spacing + shift,
        origin.y - row as f32 * spacing * ROW_PITCH,
    )
}

/// Round a point to its nearest (row, col)
///
/// The row is found first; the column then accounts for the odd-row shift.
pub fn nearest_cell(point: Vec2, origin: Vec2, spacing: f32) -> (i32, i32) {
    let row = ((origin.y - point.y) / (spacing * ROW_PITCH)).round() as i32;
    let shift = if row.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
    let col = ((point.x - origin.x) / spacing - shift).round() as i32;
    (row, col)
}

/// Snap a point onto the canonical centre of its nearest cell
pub fn snap_to_grid_cell(point: Vec2, origin: Vec2, spacing: f32) -> Vec2 {
    let (row, col) = nearest_cell(point, origin, spacing);
    cell_center(row, col, origin, spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.001;

    #[test]
    fn test_overlap_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(overlaps(a, 20.0, Vec2::new(39.9, 0.0), 20.0));
        // Exactly touching is not an overlap
        assert!(!overlaps(a, 20.0, Vec2::new(40.0, 0.0), 20.0));
    }

    #[test]
    fn test_neighbor_offsets_have_spacing_length() {
        let offsets = hex_neighbor_offsets(45.0);
        assert!((offsets[0] - Vec2::new(45.0, 0.0)).length() < EPS);
        assert!((offsets[3] - Vec2::new(-45.0, 0.0)).length() < EPS);
        for offset in offsets {
            assert!((offset.length() - 45.0).abs() < EPS);
        }
    }

    #[test]
    fn test_grid_neighbors_match_hex_offsets() {
        let geometry = GridGeometry::default();
        let center = geometry.cell_center(2, 3);
        // Both odd-row neighbors below an even-row cell sit one spacing away
        for (row, col) in [(3, 2), (3, 3), (1, 2), (1, 3), (2, 2), (2, 4)] {
            let d = distance(center, geometry.cell_center(row, col));
            assert!((d - geometry.spacing).abs() < 0.01, "({row},{col}) at {d}");
        }
    }

    #[test]
    fn test_odd_rows_shift_half_spacing() {
        let geometry = GridGeometry::default();
        let even = geometry.cell_center(0, 0);
        let odd = geometry.cell_center(1, 0);
        assert!((odd.x - even.x - geometry.spacing * 0.5).abs() < EPS);
        assert!(odd.y < even.y);
    }

    #[test]
    fn test_snap_recovers_cell_centres() {
        let geometry = GridGeometry::default();
        for row in 0..6 {
            for col in 0..5 {
                let center = geometry.cell_center(row, col);
                let jittered = center + Vec2::new(6.0, -5.0);
                let snapped = snap_to_grid_cell(jittered, geometry.origin(), geometry.spacing);
                assert!((snapped - center).length() < EPS, "({row},{col})");
            }
        }
    }

    #[test]
    fn test_snap_above_anchor_line() {
        let geometry = GridGeometry::default();
        let above = geometry.cell_center(-1, 2);
        assert_eq!(nearest_cell(above, geometry.origin(), geometry.spacing), (-1, 2));
    }
}
