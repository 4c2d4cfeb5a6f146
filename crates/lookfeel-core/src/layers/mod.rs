//! Scene entities and their capability traits.

mod group;
mod shape;
mod text;

pub use group::GroupLayer;
pub use shape::{BezierPoint, CornerStyle, ShapeLayer};
pub use text::{ParagraphAlignment, TextLayer, TypeStyle, Typography};

use crate::geometry::{rotated_frame_contains, union_bounds};
use crate::surface::DrawSurface;
use crate::text_metrics::TextMetrics;
use kurbo::{BezPath, Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl LayerColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn clear() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_clear(&self) -> bool {
        self.a == 0
    }
}

impl From<Color> for LayerColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<LayerColor> for Color {
    fn from(color: LayerColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Where a stroke sits relative to the outline it traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokePosition {
    Inside,
    #[default]
    Center,
    Outside,
}

impl StrokePosition {
    /// The rectangle whose centred stroke of `width` covers the requested
    /// side of `frame`.
    pub fn stroke_rect(self, frame: Rect, width: f64) -> Rect {
        let half = width / 2.0;
        match self {
            StrokePosition::Inside => {
                let inset = half.min(frame.width() / 2.0).min(frame.height() / 2.0);
                frame.inflate(-inset, -inset)
            }
            StrokePosition::Center => frame,
            StrokePosition::Outside => frame.inflate(half, half),
        }
    }
}

/// Fill and stroke of a colorable layer. A clear color paints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub fill: LayerColor,
    pub stroke: LayerColor,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_position: StrokePosition,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: LayerColor::white(),
            stroke: LayerColor::black(),
            stroke_width: 1.0,
            stroke_position: StrokePosition::Center,
        }
    }
}

impl Paint {
    /// Whether a fill should be emitted.
    pub fn has_fill(&self) -> bool {
        !self.fill.is_clear()
    }

    /// Whether a stroke should be emitted.
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0 && !self.stroke.is_clear()
    }
}

/// Optional layer capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Resizable,
    Colorable,
    Typographic,
    Traceable,
}

/// Position and rotation shared by every layer.
pub trait Transformable {
    /// Top-left of the layer in canvas space. Groups report the top-left
    /// of their children's bounds.
    fn position(&self) -> Point;

    /// Rotation in degrees, clockwise.
    fn rotation(&self) -> f64;

    /// Move by a relative offset.
    fn translate(&mut self, delta: Vec2);

    /// Add `degrees` to the rotation.
    fn rotate_by(&mut self, degrees: f64);
}

/// Layers with an explicit axis-aligned frame.
pub trait Resizable: Transformable {
    /// The unrotated frame in canvas space.
    fn frame(&self) -> Rect;

    /// Replace origin and size. Negative extents are normalized.
    fn set_frame(&mut self, frame: Rect);

    fn size(&self) -> Size {
        self.frame().size()
    }

    fn set_size(&mut self, size: Size) {
        let origin = self.frame().origin();
        self.set_frame(Rect::from_origin_size(origin, size));
    }

    fn set_position(&mut self, position: Point) {
        let size = self.frame().size();
        self.set_frame(Rect::from_origin_size(position, size));
    }
}

/// Layers with a fill and a stroke.
pub trait Colorable {
    fn paint(&self) -> &Paint;
    fn paint_mut(&mut self) -> &mut Paint;

    fn set_fill(&mut self, color: impl Into<LayerColor>)
    where
        Self: Sized,
    {
        self.paint_mut().fill = color.into();
    }

    fn set_stroke(&mut self, color: impl Into<LayerColor>, width: f64)
    where
        Self: Sized,
    {
        let paint = self.paint_mut();
        paint.stroke = color.into();
        paint.stroke_width = width.max(0.0);
    }
}

/// Layers that lay out text.
pub trait Typographic {
    fn typography(&self) -> &Typography;

    /// Change the font family, re-measuring through `metrics`.
    fn set_font_name(&mut self, name: &str, metrics: &dyn TextMetrics);

    /// Change the font size, re-measuring through `metrics`.
    fn set_font_size(&mut self, size: f64, metrics: &dyn TextMetrics);

    fn set_leading(&mut self, leading: f64);
    fn set_letter_spacing(&mut self, spacing: f64);
    fn set_alignment(&mut self, alignment: ParagraphAlignment);
}

/// Layers traced by bezier control points.
pub trait Traceable {
    fn points(&self) -> &[BezierPoint];
    fn set_points(&mut self, points: Vec<BezierPoint>);
    fn is_closed(&self) -> bool;
    fn set_closed(&mut self, closed: bool);

    /// The traced outline in canvas space.
    fn path(&self) -> BezPath;
}

/// Any entity in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Layer {
    Shape(ShapeLayer),
    Text(TextLayer),
    Group(GroupLayer),
}

impl Layer {
    pub fn id(&self) -> LayerId {
        match self {
            Layer::Shape(l) => l.id(),
            Layer::Text(l) => l.id(),
            Layer::Group(l) => l.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Layer::Shape(l) => &l.name,
            Layer::Text(l) => &l.name,
            Layer::Group(l) => &l.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Layer::Shape(l) => l.name = name,
            Layer::Text(l) => l.name = name,
            Layer::Group(l) => l.name = name,
        }
    }

    /// Whether this layer implements `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Resizable => self.as_resizable().is_some(),
            Capability::Colorable => self.as_colorable().is_some(),
            Capability::Typographic => self.as_typographic().is_some(),
            Capability::Traceable => self.as_traceable().is_some(),
        }
    }

    pub fn as_resizable(&self) -> Option<&dyn Resizable> {
        match self {
            Layer::Shape(l) => Some(l),
            Layer::Text(l) => Some(l),
            Layer::Group(_) => None,
        }
    }

    pub fn as_resizable_mut(&mut self) -> Option<&mut dyn Resizable> {
        match self {
            Layer::Shape(l) => Some(l),
            Layer::Text(l) => Some(l),
            Layer::Group(_) => None,
        }
    }

    pub fn as_colorable(&self) -> Option<&dyn Colorable> {
        match self {
            Layer::Shape(l) => Some(l),
            Layer::Text(l) => Some(l),
            Layer::Group(_) => None,
        }
    }

    pub fn as_colorable_mut(&mut self) -> Option<&mut dyn Colorable> {
        match self {
            Layer::Shape(l) => Some(l),
            Layer::Text(l) => Some(l),
            Layer::Group(_) => None,
        }
    }

    pub fn as_typographic(&self) -> Option<&dyn Typographic> {
        match self {
            Layer::Text(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_typographic_mut(&mut self) -> Option<&mut dyn Typographic> {
        match self {
            Layer::Text(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_traceable(&self) -> Option<&dyn Traceable> {
        match self {
            Layer::Shape(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_traceable_mut(&mut self) -> Option<&mut dyn Traceable> {
        match self {
            Layer::Shape(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            Layer::Text(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextLayer> {
        match self {
            Layer::Text(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Layer::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupLayer> {
        match self {
            Layer::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupLayer> {
        match self {
            Layer::Group(g) => Some(g),
            _ => None,
        }
    }

    /// The frame used for hit-testing and resizing. Only resizable layers
    /// have one.
    pub fn frame(&self) -> Option<Rect> {
        self.as_resizable().map(|r| r.frame())
    }

    /// The area the layer occupies: its frame, or for groups the union of
    /// the children's bounds.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Layer::Group(g) => g.bounds(),
            _ => self.frame(),
        }
    }

    /// Move the layer so that its bounds start at `position`.
    ///
    /// Leaves are set absolutely. A group has no position of its own, so it
    /// translates every child by the difference to its current bounds.
    pub fn set_position(&mut self, position: Point) {
        match self {
            Layer::Shape(l) => Resizable::set_position(l, position),
            Layer::Text(l) => Resizable::set_position(l, position),
            Layer::Group(g) => {
                if let Some(bounds) = g.bounds() {
                    g.translate(position - bounds.origin());
                }
            }
        }
    }

    /// Whether the canvas-space `point` falls on this layer, honouring
    /// rotation. Layers without a frame are never hit.
    pub fn hit_test(&self, point: Point) -> bool {
        self.as_resizable()
            .is_some_and(|r| rotated_frame_contains(r.frame(), r.rotation(), point))
    }

    /// Paint the layer. The surface transform must already map canvas space
    /// to the target; the layer only applies its own rotation.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        match self {
            Layer::Shape(l) => l.draw(surface),
            Layer::Text(l) => l.draw(surface),
            Layer::Group(g) => {
                for child in g.children() {
                    child.draw(surface);
                }
            }
        }
    }
}

impl Transformable for Layer {
    fn position(&self) -> Point {
        match self {
            Layer::Shape(l) => l.position(),
            Layer::Text(l) => l.position(),
            Layer::Group(l) => l.position(),
        }
    }

    fn rotation(&self) -> f64 {
        match self {
            Layer::Shape(l) => l.rotation(),
            Layer::Text(l) => l.rotation(),
            Layer::Group(l) => l.rotation(),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            Layer::Shape(l) => l.translate(delta),
            Layer::Text(l) => l.translate(delta),
            Layer::Group(l) => l.translate(delta),
        }
    }

    fn rotate_by(&mut self, degrees: f64) {
        match self {
            Layer::Shape(l) => l.rotate_by(degrees),
            Layer::Text(l) => l.rotate_by(degrees),
            Layer::Group(l) => l.rotate_by(degrees),
        }
    }
}

impl From<ShapeLayer> for Layer {
    fn from(layer: ShapeLayer) -> Self {
        Layer::Shape(layer)
    }
}

impl From<TextLayer> for Layer {
    fn from(layer: TextLayer) -> Self {
        Layer::Text(layer)
    }
}

impl From<GroupLayer> for Layer {
    fn from(layer: GroupLayer) -> Self {
        Layer::Group(layer)
    }
}

/// Normalize a frame so that `x0 <= x1` and `y0 <= y1`.
pub(crate) fn normalized(frame: Rect) -> Rect {
    frame.abs()
}

/// Union of the bounds of `layers`.
pub(crate) fn layers_bounds<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Option<Rect> {
    union_bounds(layers.into_iter().filter_map(Layer::bounds))
}

/// Push the rotation of a frame about its centre onto `surface`.
pub(crate) fn push_rotation(surface: &mut dyn DrawSurface, frame: Rect, degrees: f64) {
    if degrees == 0.0 {
        return;
    }
    let center = frame.center().to_vec2();
    surface.translate(center);
    surface.rotate(degrees.to_radians());
    surface.translate(-center);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rect_layer(x: f64, y: f64, w: f64, h: f64) -> Layer {
        ShapeLayer::new("Rectangle", Rect::new(x, y, x + w, y + h)).into()
    }

    #[test]
    fn test_capabilities() {
        let shape = rect_layer(0.0, 0.0, 10.0, 10.0);
        assert!(shape.supports(Capability::Resizable));
        assert!(shape.supports(Capability::Colorable));
        assert!(shape.supports(Capability::Traceable));
        assert!(!shape.supports(Capability::Typographic));

        let group: Layer = GroupLayer::new("Group", vec![shape]).into();
        assert!(!group.supports(Capability::Resizable));
        assert!(group.as_colorable().is_none());
        assert!(group.frame().is_none());
    }

    #[test]
    fn test_color_conversion() {
        let color = LayerColor::new(10, 20, 30, 40);
        let peniko: Color = color.into();
        assert_eq!(LayerColor::from(peniko), color);
    }

    #[test]
    fn test_stroke_position_rects() {
        let frame = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(StrokePosition::Center.stroke_rect(frame, 4.0), frame);
        assert_eq!(
            StrokePosition::Inside.stroke_rect(frame, 4.0),
            Rect::new(2.0, 2.0, 98.0, 48.0)
        );
        assert_eq!(
            StrokePosition::Outside.stroke_rect(frame, 4.0),
            Rect::new(-2.0, -2.0, 102.0, 52.0)
        );
    }

    #[test]
    fn test_hit_test_rotated() {
        let mut layer = rect_layer(0.0, 0.0, 100.0, 10.0);
        assert!(layer.hit_test(Point::new(90.0, 5.0)));

        layer.rotate_by(90.0);
        assert!(!layer.hit_test(Point::new(90.0, 5.0)));
        assert!(layer.hit_test(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_set_position_on_group_moves_children() {
        let mut group: Layer = GroupLayer::new(
            "Group",
            vec![rect_layer(10.0, 10.0, 10.0, 10.0), rect_layer(40.0, 0.0, 10.0, 10.0)],
        )
        .into();

        group.set_position(Point::new(0.0, 0.0));

        let bounds = group.bounds().unwrap();
        assert!((bounds.x0 - 0.0).abs() < EPS);
        assert!((bounds.y0 - 0.0).abs() < EPS);
        assert!((bounds.width() - 40.0).abs() < EPS);
    }

    #[test]
    fn test_set_name() {
        let mut layer = rect_layer(0.0, 0.0, 1.0, 1.0);
        layer.set_name("Card");
        assert_eq!(layer.name(), "Card");
    }
}
