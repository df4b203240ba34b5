//! Screen ↔ canvas coordinate transform with zoom, pan and grid snapping.

use crate::snap::{GridSnap, SnapResult};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Lowest zoom level, in percent.
pub const MIN_ZOOM: f64 = 25.0;
/// Highest zoom level, in percent.
pub const MAX_ZOOM: f64 = 200.0;
/// Zoom level at which one canvas unit is one screen pixel.
pub const DEFAULT_ZOOM: f64 = 100.0;
/// Increment used by `zoom_in`/`zoom_out`, in percent.
pub const ZOOM_STEP: f64 = 10.0;

/// View transform of the editing surface.
///
/// `origin` is where canvas (0, 0) sits in screen space and `zoom` is in
/// percent, so `canvas = (screen - origin) / (zoom / 100)`. Element
/// geometry is always stored in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasTransform {
    /// Screen position of the canvas origin (pan).
    pub origin: Point,
    /// Current zoom level in percent.
    zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Step for `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
    /// Grid snapping applied to canvas coordinates.
    pub grid: GridSnap,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            grid: GridSnap::default(),
        }
    }
}

impl CanvasTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom in percent.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a scale factor (1.0 at 100%).
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    /// Affine mapping canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale())
    }

    /// Affine mapping screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale()) * Affine::translate(-self.origin.to_vec2())
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a screen-space distance to canvas units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale()
    }

    /// Snap a canvas point to the grid (if enabled).
    pub fn snap(&self, canvas_point: Point) -> SnapResult {
        self.grid.snap_point(canvas_point)
    }

    /// Convert a screen point to canvas coordinates and snap it.
    pub fn screen_to_snapped_canvas(&self, screen_point: Point) -> Point {
        self.snap(self.screen_to_canvas(screen_point)).point
    }

    /// Set the zoom level, clamped to the allowed range.
    ///
    /// Non-finite values are ignored. Returns `true` if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            log::warn!("Ignoring non-finite zoom {}", zoom);
            return false;
        }
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.zoom_step)
    }

    /// Zoom to `zoom` percent, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) {
        // Convert screen point to canvas before zoom
        let canvas_point = self.screen_to_canvas(screen_point);
        if !self.set_zoom(zoom) {
            return;
        }

        // Adjust origin so canvas_point stays at screen_point
        let new_screen = self.canvas_to_screen(canvas_point);
        self.origin += screen_point - new_screen;
    }

    /// Pan the view by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.origin = Point::ZERO;
        self.zoom = DEFAULT_ZOOM;
    }

    /// Zoom and pan so that `bounds` fits (centered) in the viewport.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = (scale_x.min(scale_y) * 100.0).clamp(self.min_zoom, self.max_zoom);

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        let scale = self.scale();
        self.origin = Point::new(
            viewport.width / 2.0 - bounds_center.x * scale,
            viewport.height / 2.0 - bounds_center.y * scale,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{:?} != {:?}", a, b);
        assert!((a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_default_transform_is_identity() {
        let transform = CanvasTransform::new();
        assert_eq!(transform.zoom(), 100.0);
        assert_close(transform.screen_to_canvas(Point::new(100.0, 200.0)), Point::new(100.0, 200.0));
    }

    #[test]
    fn test_screen_to_canvas_formula() {
        let mut transform = CanvasTransform::new();
        transform.origin = Point::new(40.0, 10.0);
        transform.set_zoom(50.0);
        // (240 - 40) / 0.5 = 400, (110 - 10) / 0.5 = 200
        assert_close(transform.screen_to_canvas(Point::new(240.0, 110.0)), Point::new(400.0, 200.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut transform = CanvasTransform::new();
        transform.origin = Point::new(30.0, -20.0);
        transform.set_zoom(150.0);

        let original = Point::new(123.0, 456.0);
        let canvas = transform.screen_to_canvas(original);
        assert_close(transform.canvas_to_screen(canvas), original);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut transform = CanvasTransform::new();
        transform.set_zoom(1.0);
        assert_eq!(transform.zoom(), MIN_ZOOM);
        transform.set_zoom(1000.0);
        assert_eq!(transform.zoom(), MAX_ZOOM);
        assert!(!transform.set_zoom(f64::NAN));
        assert_eq!(transform.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_zoom_steps() {
        let mut transform = CanvasTransform::new();
        assert!(transform.zoom_in());
        assert_eq!(transform.zoom(), 110.0);
        transform.zoom_out();
        transform.zoom_out();
        assert_eq!(transform.zoom(), 90.0);

        transform.set_zoom(MAX_ZOOM);
        assert!(!transform.zoom_in());
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut transform = CanvasTransform::new();
        let anchor = Point::new(300.0, 200.0);
        let before = transform.screen_to_canvas(anchor);
        transform.zoom_at(anchor, 180.0);
        assert_close(transform.screen_to_canvas(anchor), before);
        assert_eq!(transform.zoom(), 180.0);
    }

    #[test]
    fn test_pan() {
        let mut transform = CanvasTransform::new();
        transform.pan(Vec2::new(10.0, 20.0));
        assert_close(transform.screen_to_canvas(Point::new(10.0, 20.0)), Point::ZERO);
    }

    #[test]
    fn test_snap_respects_toggle() {
        let mut transform = CanvasTransform::new();
        assert_eq!(transform.snap(Point::new(117.0, 132.0)).point, Point::new(120.0, 140.0));
        transform.grid.enabled = false;
        assert_eq!(transform.snap(Point::new(117.0, 132.0)).point, Point::new(117.0, 132.0));
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut transform = CanvasTransform::new();
        transform.fit_to_bounds(
            Rect::new(0.0, 0.0, 1200.0, 800.0),
            Size::new(600.0, 400.0),
            0.0,
        );
        assert_eq!(transform.zoom(), 50.0);
        assert_close(transform.canvas_to_screen(Point::new(600.0, 400.0)), Point::new(300.0, 200.0));
    }
}
