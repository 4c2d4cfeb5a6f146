//! Headless surface that records draw calls.

use crate::renderer::{RenderContext, RenderResult, Renderer, paint_frame};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use lookfeel_core::{DrawSurface, LayerColor, TextRun};
use peniko::Color;

/// A single draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(LayerColor),
    FillRect {
        rect: Rect,
        color: LayerColor,
    },
    StrokeRect {
        rect: Rect,
        color: LayerColor,
        width: f64,
    },
    FillPath {
        path: BezPath,
        color: LayerColor,
    },
    StrokePath {
        path: BezPath,
        color: LayerColor,
        width: f64,
    },
    /// Unwrapped text with its top-left at `origin`.
    TextAt {
        text: String,
        font_name: String,
        font_size: f64,
        color: LayerColor,
        origin: Point,
    },
    /// Text flowed inside `frame`.
    TextIn {
        text: String,
        font_name: String,
        font_size: f64,
        color: LayerColor,
        frame: Rect,
    },
}

/// A draw call and the transform in effect when it was made.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub command: DrawCommand,
    pub transform: Affine,
}

/// Records every draw call with its fully resolved transform.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<RecordedCommand>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// The current transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drop everything recorded and reset the transform.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.stack.clear();
        self.transform = Affine::IDENTITY;
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(RecordedCommand {
            command,
            transform: self.transform,
        });
    }
}

impl DrawSurface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform *= Affine::translate(offset);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform *= Affine::scale_non_uniform(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform *= Affine::rotate(radians);
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(RecordedCommand {
            command: DrawCommand::Clear(color.into()),
            transform: Affine::IDENTITY,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect {
            rect,
            color: color.into(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color: color.into(),
            width,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.push(DrawCommand::FillPath {
            path: path.clone(),
            color: color.into(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.push(DrawCommand::StrokePath {
            path: path.clone(),
            color: color.into(),
            width,
        });
    }

    fn draw_text_at(&mut self, run: &TextRun<'_>, origin: Point) {
        self.push(DrawCommand::TextAt {
            text: run.text.to_string(),
            font_name: run.font_name.to_string(),
            font_size: run.font_size,
            color: run.color.into(),
            origin,
        });
    }

    fn draw_text_in(&mut self, run: &TextRun<'_>, frame: Rect) {
        self.push(DrawCommand::TextIn {
            text: run.text.to_string(),
            font_name: run.font_name.to_string(),
            font_size: run.font_size,
            color: run.color.into(),
            frame,
        });
    }
}

impl Renderer for RecordingSurface {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.reset();
        paint_frame(ctx, self)
    }
}
