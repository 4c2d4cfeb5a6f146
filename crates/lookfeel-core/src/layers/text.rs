//! Text layer.

use super::{Colorable, LayerColor, LayerId, Paint, Resizable, Transformable, Typographic, normalized};
use crate::surface::{DrawSurface, TextRun};
use crate::text_metrics::{DEFAULT_FONT_NAME, TextMetrics, measure_with_fallback};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How text occupies its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeStyle {
    /// Sized by its content; resizing stretches the glyphs.
    #[default]
    Point,
    /// Flows inside a fixed frame.
    Paragraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParagraphAlignment {
    #[default]
    Left,
    Center,
    Right,
    LeftJustified,
    CenterJustified,
    RightJustified,
}

/// Font and paragraph settings of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub font_name: String,
    pub font_size: f64,
    pub leading: f64,
    pub letter_spacing: f64,
    pub alignment: ParagraphAlignment,
    pub type_style: TypeStyle,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size: 16.0,
            leading: 0.0,
            letter_spacing: 0.0,
            alignment: ParagraphAlignment::Left,
            type_style: TypeStyle::Point,
        }
    }
}

/// A run of text placed on the canvas.
///
/// Point text remembers its measured `natural_size`. Resizing it keeps
/// `size` as the new frame and records `scale = size / natural_size`,
/// which is applied when drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLayer {
    pub(crate) id: LayerId,
    pub name: String,
    content: String,
    position: Point,
    size: Size,
    rotation: f64,
    pub paint: Paint,
    typography: Typography,
    natural_size: Size,
    scale: Vec2,
}

impl TextLayer {
    /// Create point text at `position`, sized by `metrics`.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        position: Point,
        typography: Typography,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let content = content.into();
        let natural_size = measure_with_fallback(
            metrics,
            &typography.font_name,
            typography.font_size,
            &content,
        );
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content,
            position,
            size: natural_size,
            rotation: 0.0,
            paint: Paint {
                fill: LayerColor::black(),
                stroke: LayerColor::clear(),
                stroke_width: 0.0,
                ..Paint::default()
            },
            typography,
            natural_size,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Create paragraph text flowing inside `frame`.
    pub fn paragraph(
        name: impl Into<String>,
        content: impl Into<String>,
        frame: Rect,
        typography: Typography,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let typography = Typography {
            type_style: TypeStyle::Paragraph,
            ..typography
        };
        let frame = normalized(frame);
        let mut layer = Self::new(name, content, frame.origin(), typography, metrics);
        layer.size = frame.size();
        layer
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn natural_size(&self) -> Size {
        self.natural_size
    }

    /// Stretch applied to point text when drawn. Always 1 for paragraphs.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn type_style(&self) -> TypeStyle {
        self.typography.type_style
    }

    /// Replace the text and re-measure, resetting any stretch.
    pub fn set_content(&mut self, content: impl Into<String>, metrics: &dyn TextMetrics) {
        self.content = content.into();
        self.remeasure(metrics, false);
    }

    /// Switch between point and paragraph flow. The frame is kept.
    pub fn set_type_style(&mut self, style: TypeStyle) {
        self.typography.type_style = style;
        self.scale = match style {
            TypeStyle::Point => scale_between(self.size, self.natural_size),
            TypeStyle::Paragraph => Vec2::new(1.0, 1.0),
        };
    }

    /// Measure the current content again.
    ///
    /// With `preserve_scale` the stretch survives and the frame becomes the
    /// new natural size times the stretch; otherwise the frame snaps back to
    /// the natural size.
    pub fn remeasure(&mut self, metrics: &dyn TextMetrics, preserve_scale: bool) {
        let natural_size = measure_with_fallback(
            metrics,
            &self.typography.font_name,
            self.typography.font_size,
            &self.content,
        );
        self.apply_natural_size(natural_size, preserve_scale);
    }

    pub(crate) fn apply_natural_size(&mut self, natural_size: Size, preserve_scale: bool) {
        self.natural_size = natural_size;
        if self.typography.type_style == TypeStyle::Paragraph {
            return;
        }
        if preserve_scale {
            self.size = Size::new(
                natural_size.width * self.scale.x,
                natural_size.height * self.scale.y,
            );
        } else {
            self.scale = Vec2::new(1.0, 1.0);
            self.size = natural_size;
        }
    }

    fn run(&self) -> TextRun<'_> {
        TextRun {
            text: &self.content,
            font_name: &self.typography.font_name,
            font_size: self.typography.font_size,
            color: self.paint.fill.into(),
            leading: self.typography.leading,
            letter_spacing: self.typography.letter_spacing,
            alignment: self.typography.alignment,
        }
    }

    pub(crate) fn draw(&self, surface: &mut dyn DrawSurface) {
        let frame = self.frame();
        let run = self.run();

        surface.save();
        surface.translate(frame.center().to_vec2());
        surface.rotate(self.rotation.to_radians());
        surface.translate(Vec2::new(-self.size.width / 2.0, -self.size.height / 2.0));
        match self.typography.type_style {
            TypeStyle::Point => {
                surface.scale(self.scale.x, self.scale.y);
                surface.draw_text_at(&run, Point::ZERO);
            }
            TypeStyle::Paragraph => {
                surface.draw_text_in(&run, Rect::from_origin_size(Point::ZERO, self.size));
            }
        }
        surface.restore();
    }
}

/// Per-axis `size / natural`, 1 where the natural extent is zero.
fn scale_between(size: Size, natural: Size) -> Vec2 {
    let axis = |size: f64, natural: f64| {
        if natural.abs() < f64::EPSILON {
            1.0
        } else {
            size / natural
        }
    };
    Vec2::new(
        axis(size.width, natural.width),
        axis(size.height, natural.height),
    )
}

impl Transformable for TextLayer {
    fn position(&self) -> Point {
        self.position
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn rotate_by(&mut self, degrees: f64) {
        self.rotation += degrees;
    }
}

impl Resizable for TextLayer {
    fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    fn set_frame(&mut self, frame: Rect) {
        let frame = normalized(frame);
        self.position = frame.origin();
        self.size = frame.size();
        if self.typography.type_style == TypeStyle::Point {
            self.scale = scale_between(self.size, self.natural_size);
        }
    }
}

impl Colorable for TextLayer {
    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }
}

impl Typographic for TextLayer {
    fn typography(&self) -> &Typography {
        &self.typography
    }

    fn set_font_name(&mut self, name: &str, metrics: &dyn TextMetrics) {
        self.typography.font_name = name.to_string();
        self.remeasure(metrics, false);
    }

    fn set_font_size(&mut self, size: f64, metrics: &dyn TextMetrics) {
        self.typography.font_size = size.max(0.0);
        self.remeasure(metrics, false);
    }

    fn set_leading(&mut self, leading: f64) {
        self.typography.leading = leading;
    }

    fn set_letter_spacing(&mut self, spacing: f64) {
        self.typography.letter_spacing = spacing;
    }

    fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        self.typography.alignment = alignment;
    }
}
