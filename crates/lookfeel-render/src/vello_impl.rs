//! Vello draw surface.

use crate::renderer::{RenderContext, RenderResult, Renderer, paint_frame};
use kurbo::{Affine, BezPath, Point, Rect, Size, Stroke, Vec2};
use lookfeel_core::{DrawSurface, ParagraphAlignment, TextRun};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use std::sync::Arc;
use vello::Scene;

/// Builds a [`vello::Scene`] from draw-surface calls.
pub struct VelloSurface {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering.
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    transform: Affine,
    stack: Vec<Affine>,
    /// Area covered by `clear`.
    viewport_size: Size,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            viewport_size: Size::ZERO,
        }
    }

    /// Make a font file available to text layers by its family name.
    pub fn register_font(&mut self, data: Vec<u8>) {
        self.font_cx
            .collection
            .register_fonts(vello::peniko::Blob::new(Arc::new(data)), None);
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn draw_text(&mut self, run: &TextRun<'_>, origin: Point, max_width: Option<f64>) {
        if run.text.is_empty() {
            return;
        }
        let brush = Brush::Solid(run.color);

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, run.text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(run.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::LetterSpacing(run.letter_spacing as f32));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Named(run.font_name.into()),
        )));
        let mut layout = builder.build(run.text);
        layout.break_all_lines(max_width.map(|w| w as f32));
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let available = max_width.unwrap_or(layout.width() as f64);
        let shift = match run.alignment {
            ParagraphAlignment::Left | ParagraphAlignment::LeftJustified => 0.0,
            ParagraphAlignment::Center | ParagraphAlignment::CenterJustified => 0.5,
            ParagraphAlignment::Right | ParagraphAlignment::RightJustified => 1.0,
        };

        let text_transform = self.transform * Affine::translate(origin.to_vec2());
        let mut glyph_count = 0;

        for (index, line) in layout.lines().enumerate() {
            let line_offset = (available - line.metrics().advance as f64) * shift;
            let leading = run.leading * index as f64;
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let glyph_source = glyph_run.run();
                let font = glyph_source.font();
                let font_size = glyph_source.font_size();
                let glyph_xform = glyph_source
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform * Affine::translate((line_offset, leading)))
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(glyph_source.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // Font not registered: mark where the text would be.
        if glyph_count == 0 {
            log::debug!("No glyphs for font '{}'", run.font_name);
            let rect = Rect::from_origin_size(
                origin,
                (layout.width().max(20.0) as f64, run.font_size * 1.2),
            );
            self.scene.fill(
                Fill::NonZero,
                self.transform,
                Color::from_rgba8(255, 100, 100, 100),
                None,
                &rect,
            );
        }
    }
}

impl DrawSurface for VelloSurface {
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
        let rect = Rect::from_origin_size(Point::ZERO, self.viewport_size);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.transform, color, None, &rect);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), self.transform, color, None, &rect);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.transform, color, None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), self.transform, color, None, path);
    }

    fn draw_text_at(&mut self, run: &TextRun<'_>, origin: Point) {
        self.draw_text(run, origin, None);
    }

    fn draw_text_in(&mut self, run: &TextRun<'_>, frame: Rect) {
        self.draw_text(run, frame.origin(), Some(frame.width()));
    }
}

impl Renderer for VelloSurface {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene.reset();
        self.stack.clear();
        self.transform = Affine::IDENTITY;
        self.viewport_size = ctx.viewport_size;
        paint_frame(ctx, self)
    }
}
