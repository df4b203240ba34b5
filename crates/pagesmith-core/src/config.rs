//! Editor configuration.

use crate::drag::MIN_ELEMENT_SIZE;
use crate::history::MAX_HISTORY;
use crate::snap::{GridSnap, GRID_SIZE};
use crate::transform::{CanvasTransform, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Tunables of an editing session.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid cell size in canvas units.
    pub grid_size: f64,
    pub snap_to_grid: bool,
    /// Zoom bounds and step, in percent.
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: Vec2,
    /// Smallest width/height a resize may produce.
    pub min_element_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: true,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            history_limit: MAX_HISTORY,
            duplicate_offset: Vec2::new(20.0, 20.0),
            min_element_size: MIN_ELEMENT_SIZE,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Initial view transform for this config.
    pub fn transform(&self) -> CanvasTransform {
        let mut transform = CanvasTransform::new();
        transform.min_zoom = self.min_zoom.min(self.max_zoom);
        transform.max_zoom = self.max_zoom.max(self.min_zoom);
        transform.zoom_step = self.zoom_step;
        transform.grid = GridSnap {
            enabled: self.snap_to_grid,
            cell_size: self.grid_size,
        };
        // Re-clamp the initial zoom into the configured range.
        let zoom = transform.zoom();
        transform.set_zoom(zoom);
        transform
    }
}
