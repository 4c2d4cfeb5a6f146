//! Viewport pan/zoom and the canvas <-> screen transform.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The view transform of the canvas.
///
/// Canvas space maps to screen space by scaling first and translating
/// second: `screen = canvas * zoom + pan_offset`. This matches the draw
/// order `translate(pan); scale(zoom)` applied to canvas-space geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space translation (pan).
    pub pan_offset: Vec2,
    /// Current zoom factor (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    zoom_in_exponent: f64,
    zoom_out_exponent: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport using the zoom bounds and policy of a config.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            zoom: config.initial_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_in_exponent: config.zoom_in_exponent,
            zoom_out_exponent: config.zoom_out_exponent,
        }
    }

    /// Canvas -> screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan_offset) * Affine::scale(self.zoom)
    }

    /// Screen -> canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan_offset)
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    /// Convert a canvas rectangle to its screen-space rectangle.
    pub fn canvas_rect_to_screen(&self, rect: Rect) -> Rect {
        let p0 = self.canvas_to_screen(Point::new(rect.x0, rect.y0));
        let p1 = self.canvas_to_screen(Point::new(rect.x1, rect.y1));
        Rect::new(p0.x, p0.y, p1.x, p1.y)
    }

    /// Convert a screen-space displacement into canvas units.
    ///
    /// Only zoom applies; pan does not affect directions or distances.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Pan by a raw screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    /// Set the zoom level while keeping `screen_point` over the same
    /// canvas point. Returns false when the clamped zoom is unchanged.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) -> bool {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if !new_zoom.is_finite() || (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let canvas_point = self.screen_to_canvas(screen_point);
        self.zoom = new_zoom;
        self.pan_offset = Vec2::new(
            screen_point.x - canvas_point.x * new_zoom,
            screen_point.y - canvas_point.y * new_zoom,
        );
        true
    }

    /// Apply a pinch gesture of `magnification` centered on `screen_point`.
    ///
    /// Zoom grows as `(zoom + m)^1.009`; shrinking above 100% eases with
    /// `(zoom + m)^0.99`. The base is floored at `min_zoom` so a large
    /// negative pinch cannot go below the bound (or produce NaN).
    pub fn magnify(&mut self, screen_point: Point, magnification: f64) -> bool {
        let base = (self.zoom + magnification).max(self.min_zoom);
        let exponent = if magnification < 0.0 && self.zoom > 1.0 {
            self.zoom_out_exponent
        } else {
            self.zoom_in_exponent
        };
        let changed = self.zoom_at(screen_point, base.powf(exponent));
        if changed {
            log::debug!("Zoom changed to {:.3}", self.zoom);
        }
        changed
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.pan_offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }

    /// Fit the viewport to show the given canvas-space bounds.
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
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.pan_offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.pan_offset, Vec2::ZERO);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_then_translate() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.pan_offset = Vec2::new(10.0, -5.0);

        let screen = viewport.canvas_to_screen(Point::new(3.0, 4.0));
        assert!((screen.x - 16.0).abs() < EPS);
        assert!((screen.y - 3.0).abs() < EPS);
    }

    #[test]
    fn test_screen_to_canvas_with_offset_and_zoom() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.pan_offset = Vec2::new(50.0, 100.0);

        let canvas = viewport.screen_to_canvas(Point::new(150.0, 300.0));
        assert!((canvas.x - 50.0).abs() < EPS);
        assert!((canvas.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        for &(zoom, pan) in &[
            (0.05, Vec2::new(-300.0, 12.5)),
            (1.5, Vec2::new(30.0, -20.0)),
            (73.0, Vec2::new(0.25, 999.0)),
        ] {
            viewport.zoom = zoom;
            viewport.pan_offset = pan;
            for &p in &[Point::new(123.0, 456.0), Point::new(-0.5, 1e4), Point::ZERO] {
                let back = viewport.screen_to_canvas(viewport.canvas_to_screen(p));
                assert!((back.x - p.x).abs() < 1e-7);
                assert!((back.y - p.y).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn test_canvas_rect_to_screen() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.pan_offset = Vec2::new(10.0, 20.0);

        let rect = viewport.canvas_rect_to_screen(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 210.0, 120.0));
    }

    #[test]
    fn test_screen_delta_ignores_pan() {
        let mut viewport = Viewport::new();
        viewport.zoom = 4.0;
        viewport.pan_offset = Vec2::new(500.0, 500.0);

        let delta = viewport.screen_delta_to_canvas(Vec2::new(40.0, -8.0));
        assert!((delta.x - 10.0).abs() < EPS);
        assert!((delta.y + 2.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut viewport = Viewport::new();
        assert!(viewport.zoom_at(Point::new(50.0, 50.0), 2.0));

        assert!((viewport.pan_offset.x + 50.0).abs() < EPS);
        assert!((viewport.pan_offset.y + 50.0).abs() < EPS);
        let screen = viewport.canvas_to_screen(Point::new(50.0, 50.0));
        assert!((screen.x - 50.0).abs() < EPS);
        assert!((screen.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.0001);
        assert!((viewport.zoom - viewport.min_zoom).abs() < f64::EPSILON);

        viewport.zoom_at(Point::ZERO, 1e6);
        assert!((viewport.zoom - viewport.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_magnify_in_and_out() {
        let mut viewport = Viewport::new();
        assert!(viewport.magnify(Point::new(10.0, 10.0), 1.0));
        let expected = 2.0_f64.powf(1.009);
        assert!((viewport.zoom - expected).abs() < EPS);

        let before = viewport.zoom;
        assert!(viewport.magnify(Point::new(10.0, 10.0), -0.5));
        let expected = (before - 0.5).powf(0.99);
        assert!((viewport.zoom - expected).abs() < EPS);
    }

    #[test]
    fn test_magnify_large_negative_pinch_stays_finite() {
        let mut viewport = Viewport::new();
        viewport.magnify(Point::new(10.0, 10.0), -50.0);
        assert!(viewport.zoom.is_finite());
        assert!(viewport.zoom >= viewport.min_zoom);
        assert!(viewport.pan_offset.x.is_finite());
    }

    #[test]
    fn test_magnify_keeps_pointer_fixed() {
        let mut viewport = Viewport::new();
        viewport.pan_offset = Vec2::new(-30.0, 15.0);
        let pointer = Point::new(200.0, 120.0);
        let under = viewport.screen_to_canvas(pointer);

        viewport.magnify(pointer, 0.7);

        let screen = viewport.canvas_to_screen(under);
        assert!((screen.x - pointer.x).abs() < 1e-7);
        assert!((screen.y - pointer.y).abs() < 1e-7);
    }

    #[test]
    fn test_pan_is_raw() {
        let mut viewport = Viewport::new();
        viewport.zoom = 3.0;
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.pan_offset.x - 10.0).abs() < f64::EPSILON);
        assert!((viewport.pan_offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds_centers_content() {
        let mut viewport = Viewport::new();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(300.0, 300.0), 50.0);

        assert!((viewport.zoom - 2.0).abs() < EPS);
        let center = viewport.canvas_to_screen(Point::new(50.0, 25.0));
        assert!((center.x - 150.0).abs() < EPS);
        assert!((center.y - 150.0).abs() < EPS);
    }
}
