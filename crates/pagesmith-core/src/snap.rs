//! Snap functionality for aligning geometry to the grid.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap one coordinate to the nearest multiple of `cell_size`.
pub fn snap_value(value: f64, cell_size: f64) -> f64 {
    (value / cell_size).round() * cell_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    SnapResult {
        point: Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size)),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Grid snapping settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSnap {
    pub enabled: bool,
    pub cell_size: f64,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: GRID_SIZE,
        }
    }
}

impl GridSnap {
    /// Snap a point if snapping is on and the cell size is usable.
    pub fn snap_point(&self, point: Point) -> SnapResult {
        if self.is_active() {
            snap_to_grid(point, self.cell_size)
        } else {
            SnapResult::none(point)
        }
    }

    /// Snap a single coordinate.
    pub fn snap_value(&self, value: f64) -> f64 {
        if self.is_active() {
            snap_value(value, self.cell_size)
        } else {
            value
        }
    }

    fn is_active(&self) -> bool {
        self.enabled && self.cell_size.is_finite() && self.cell_size > 0.0
    }
}
