//! Vector shape layer.

use super::{
    Colorable, LayerId, Paint, Resizable, Traceable, Transformable, normalized, push_rotation,
};
use crate::surface::DrawSurface;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the two handles of a bezier point relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerStyle {
    /// Independent handles, sharp corner.
    #[default]
    Corner,
    /// Collinear and equidistant from the anchor.
    Mirrored,
    /// Collinear, distances may differ.
    Asymmetric,
}

/// A control point of a traced outline.
///
/// All coordinates are absolute positions in the layer's unit frame:
/// `(0, 0)` is the frame's top-left and `(1, 1)` its bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPoint {
    pub anchor: Point,
    /// Controls the curve entering the anchor.
    pub handle_in: Point,
    /// Controls the curve leaving the anchor.
    pub handle_out: Point,
    #[serde(default)]
    pub corner: CornerStyle,
}

impl BezierPoint {
    /// A sharp corner with both handles on the anchor.
    pub fn corner(anchor: Point) -> Self {
        Self {
            anchor,
            handle_in: anchor,
            handle_out: anchor,
            corner: CornerStyle::Corner,
        }
    }

    /// A smooth point whose incoming handle mirrors `handle_out`.
    pub fn mirrored(anchor: Point, handle_out: Point) -> Self {
        Self {
            anchor,
            handle_in: anchor - (handle_out - anchor),
            handle_out,
            corner: CornerStyle::Mirrored,
        }
    }

    /// Move the outgoing handle, updating the incoming one per the corner
    /// style.
    pub fn set_handle_out(&mut self, handle: Point) {
        self.handle_out = handle;
        match self.corner {
            CornerStyle::Corner => {}
            CornerStyle::Mirrored => self.handle_in = self.anchor - (handle - self.anchor),
            CornerStyle::Asymmetric => {
                let out = handle - self.anchor;
                let length = (self.handle_in - self.anchor).hypot();
                if out.hypot() > f64::EPSILON {
                    self.handle_in = self.anchor - out.normalize() * length;
                }
            }
        }
    }
}

/// A rectangle or traced outline with fill and stroke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeLayer {
    pub(crate) id: LayerId,
    pub name: String,
    /// Top-left corner in canvas space.
    position: Point,
    width: f64,
    height: f64,
    /// Degrees, clockwise, about the frame centre.
    rotation: f64,
    pub paint: Paint,
    /// Outline in unit-frame space. Empty means the frame rectangle.
    points: Vec<BezierPoint>,
    closed: bool,
}

impl ShapeLayer {
    /// Create a rectangle covering `frame`.
    pub fn new(name: impl Into<String>, frame: Rect) -> Self {
        let frame = normalized(frame);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: frame.origin(),
            width: frame.width(),
            height: frame.height(),
            rotation: 0.0,
            paint: Paint::default(),
            points: Vec::new(),
            closed: true,
        }
    }

    /// Builder-style paint override.
    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    /// Builder-style outline.
    pub fn with_points(mut self, points: Vec<BezierPoint>, closed: bool) -> Self {
        self.points = points;
        self.closed = closed;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Map a unit-frame point to canvas space.
    fn to_canvas(&self, unit: Point) -> Point {
        Point::new(
            self.position.x + unit.x * self.width,
            self.position.y + unit.y * self.height,
        )
    }

    pub(crate) fn draw(&self, surface: &mut dyn DrawSurface) {
        let frame = self.frame();
        surface.save();
        push_rotation(surface, frame, self.rotation);

        if self.points.is_empty() {
            if self.paint.has_fill() {
                surface.fill_rect(frame, self.paint.fill.into());
            }
            if self.paint.has_stroke() {
                let stroke_rect = self
                    .paint
                    .stroke_position
                    .stroke_rect(frame, self.paint.stroke_width);
                surface.stroke_rect(stroke_rect, self.paint.stroke.into(), self.paint.stroke_width);
            }
        } else {
            // Paths always stroke centred on the outline.
            let path = self.path();
            if self.paint.has_fill() && self.closed {
                surface.fill_path(&path, self.paint.fill.into());
            }
            if self.paint.has_stroke() {
                surface.stroke_path(&path, self.paint.stroke.into(), self.paint.stroke_width);
            }
        }

        surface.restore();
    }
}

impl Transformable for ShapeLayer {
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

impl Resizable for ShapeLayer {
    fn frame(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn set_frame(&mut self, frame: Rect) {
        let frame = normalized(frame);
        self.position = frame.origin();
        self.width = frame.width();
        self.height = frame.height();
    }
}

impl Colorable for ShapeLayer {
    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }
}

impl Traceable for ShapeLayer {
    fn points(&self) -> &[BezierPoint] {
        &self.points
    }

    fn set_points(&mut self, points: Vec<BezierPoint>) {
        self.points = points;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return kurbo::Shape::to_path(&self.frame(), 0.1);
        };

        path.move_to(self.to_canvas(first.anchor));
        for pair in self.points.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            path.curve_to(
                self.to_canvas(from.handle_out),
                self.to_canvas(to.handle_in),
                self.to_canvas(to.anchor),
            );
        }
        if self.closed {
            if let Some(last) = self.points.last() {
                if self.points.len() > 1 {
                    path.curve_to(
                        self.to_canvas(last.handle_out),
                        self.to_canvas(first.handle_in),
                        self.to_canvas(first.anchor),
                    );
                }
            }
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Size};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_new_normalizes_frame() {
        let shape = ShapeLayer::new("Rectangle", Rect::new(100.0, 50.0, 0.0, 0.0));
        assert_eq!(shape.frame(), Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_set_size_keeps_origin() {
        let mut shape = ShapeLayer::new("Rectangle", Rect::new(10.0, 10.0, 20.0, 20.0));
        shape.set_size(Size::new(5.0, 40.0));
        assert_eq!(shape.frame(), Rect::new(10.0, 10.0, 15.0, 50.0));
    }

    #[test]
    fn test_path_follows_frame() {
        let mut shape = ShapeLayer::new("Triangle", Rect::new(0.0, 0.0, 100.0, 100.0)).with_points(
            vec![
                BezierPoint::corner(Point::new(0.5, 0.0)),
                BezierPoint::corner(Point::new(1.0, 1.0)),
                BezierPoint::corner(Point::new(0.0, 1.0)),
            ],
            true,
        );

        shape.set_frame(Rect::new(0.0, 0.0, 200.0, 50.0));
        let path = shape.path();
        let elements: Vec<PathEl> = path.elements().to_vec();

        assert_eq!(elements[0], PathEl::MoveTo(Point::new(100.0, 0.0)));
        match elements[1] {
            PathEl::CurveTo(_, _, end) => {
                assert!((end.x - 200.0).abs() < EPS);
                assert!((end.y - 50.0).abs() < EPS);
            }
            ref other => panic!("unexpected element {:?}", other),
        }
        assert_eq!(elements.last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_empty_outline_is_frame() {
        let shape = ShapeLayer::new("Rectangle", Rect::new(0.0, 0.0, 10.0, 10.0));
        let bbox = kurbo::Shape::bounding_box(&shape.path());
        assert_eq!(bbox, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_mirrored_handles() {
        let mut point = BezierPoint::mirrored(Point::new(0.5, 0.5), Point::new(0.7, 0.5));
        assert!((point.handle_in.x - 0.3).abs() < EPS);

        point.set_handle_out(Point::new(0.5, 0.9));
        assert!((point.handle_in.x - 0.5).abs() < EPS);
        assert!((point.handle_in.y - 0.1).abs() < EPS);
    }

    #[test]
    fn test_asymmetric_keeps_incoming_length() {
        let mut point = BezierPoint {
            anchor: Point::new(0.0, 0.0),
            handle_in: Point::new(-0.1, 0.0),
            handle_out: Point::new(0.4, 0.0),
            corner: CornerStyle::Asymmetric,
        };
        point.set_handle_out(Point::new(0.0, 0.4));
        assert!((point.handle_in.x - 0.0).abs() < EPS);
        assert!((point.handle_in.y + 0.1).abs() < EPS);
    }
}
