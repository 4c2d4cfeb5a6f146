//! The draw-surface boundary that layers paint onto.

use crate::layers::ParagraphAlignment;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;

/// Attributed text handed to a surface.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub font_name: &'a str,
    pub font_size: f64,
    pub color: Color,
    /// Extra space between lines, in points.
    pub leading: f64,
    /// Extra space between glyphs, in points.
    pub letter_spacing: f64,
    pub alignment: ParagraphAlignment,
}

/// A 2D drawing target with a save/restore transform stack.
///
/// Transform calls compose onto the current transform, so geometry passed
/// to the primitives is in the coordinate space established by them.
pub trait DrawSurface {
    /// Push the current transform.
    fn save(&mut self);
    /// Pop to the last saved transform. Unbalanced calls are ignored.
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Rotate by `radians` (clockwise on a y-down surface).
    fn rotate(&mut self, radians: f64);

    /// Fill the whole target, ignoring the transform.
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn fill_path(&mut self, path: &BezPath, color: Color);
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);
    /// Draw a single unwrapped line of text with its top-left at `origin`.
    fn draw_text_at(&mut self, run: &TextRun<'_>, origin: Point);
    /// Draw text flowed inside `frame`.
    fn draw_text_in(&mut self, run: &TextRun<'_>, frame: Rect);
}
