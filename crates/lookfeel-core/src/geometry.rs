//! Stateless geometry: bounding-box union, rotation and the multi-layer
//! resize computation.

use crate::handles::SelectionHandle;
use kurbo::{Affine, Point, Rect, Vec2};

/// Smallest axis-aligned rectangle covering every input, or `None` when the
/// input is empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, rect| {
        Rect::new(
            acc.x0.min(rect.x0),
            acc.y0.min(rect.y0),
            acc.x1.max(rect.x1),
            acc.y1.max(rect.y1),
        )
    }))
}

/// Rotation by `degrees` (clockwise on a y-down surface) about the centre of
/// `frame`.
pub fn rotation_about_center(frame: Rect, degrees: f64) -> Affine {
    Affine::rotate_about(degrees.to_radians(), frame.center())
}

/// Whether `point` lies in `frame` once `frame` is rotated by `degrees`
/// about its centre.
pub fn rotated_frame_contains(frame: Rect, degrees: f64, point: Point) -> bool {
    if degrees == 0.0 {
        return frame.contains(point);
    }
    let local = rotation_about_center(frame, degrees).inverse() * point;
    frame.contains(local)
}

/// Per-axis inputs of the resize math.
struct AxisResize {
    /// Signed drag along the axis, positive when the frame grows.
    delta: f64,
    /// Relative growth of the selection frame along the axis.
    scale: f64,
}

fn axis_resize(sign: f64, drag: f64, selection_extent: f64) -> Option<AxisResize> {
    if sign == 0.0 {
        return Some(AxisResize { delta: 0.0, scale: 0.0 });
    }
    if selection_extent.abs() < f64::EPSILON {
        return None;
    }
    let delta = sign * drag;
    let scale = (selection_extent + delta) / selection_extent - 1.0;
    Some(AxisResize { delta, scale })
}

/// Returns `(origin, extent)` for one axis, normalized to a non-negative
/// extent.
fn resize_axis(
    origin: f64,
    extent: f64,
    selection_origin: f64,
    handle_point: f64,
    axis: &AxisResize,
) -> (f64, f64) {
    let signed = extent + extent * axis.scale;
    let mut new_origin = origin
        + (handle_point - 1.0) * axis.delta
        + (origin - selection_origin) * axis.scale;
    let new_extent = signed.abs();
    if signed < 0.0 {
        new_origin -= new_extent;
    }
    (new_origin, new_extent)
}

/// Compute the new frame of one member of a selection being resized.
///
/// `initial` is the member's frame at gesture start, `selection` the union of
/// all members' initial frames, `canvas_delta` the pointer displacement
/// since gesture start in canvas units.
///
/// Every member scales by the same relative amount as the selection frame,
/// and keeps its relative position inside it, so the edge or corner opposite
/// to `handle` stays pinned. Dragging past the anchor flips the frame while
/// keeping its extent non-negative.
///
/// Returns `None` when the selection frame has zero extent along an axis the
/// handle drives; the whole gesture is then a no-op.
pub fn resized_frame(
    initial: Rect,
    selection: Rect,
    canvas_delta: Vec2,
    handle: SelectionHandle,
) -> Option<Rect> {
    let point = handle.point();
    let x = axis_resize(handle.horizontal_sign(), canvas_delta.x, selection.width())?;
    let y = axis_resize(handle.vertical_sign(), canvas_delta.y, selection.height())?;

    let (x0, width) = resize_axis(initial.x0, initial.width(), selection.x0, point.x, &x);
    let (y0, height) = resize_axis(initial.y0, initial.height(), selection.y0, point.y, &y);

    log::trace!(
        "Resize {:?} by ({:.2}, {:.2}): scale ({:.4}, {:.4})",
        handle,
        canvas_delta.x,
        canvas_delta.y,
        x.scale,
        y.scale
    );

    Some(Rect::new(x0, y0, x0 + width, y0 + height))
}
