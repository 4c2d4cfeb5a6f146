//! Selection handles and cursor affordances.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// One of the eight resize handles on a selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionHandle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl SelectionHandle {
    /// All handles in row-major order (top row, middle row, bottom row).
    pub const ALL: [SelectionHandle; 8] = [
        SelectionHandle::TopLeft,
        SelectionHandle::Top,
        SelectionHandle::TopRight,
        SelectionHandle::Left,
        SelectionHandle::Right,
        SelectionHandle::BottomLeft,
        SelectionHandle::Bottom,
        SelectionHandle::BottomRight,
    ];

    /// The handle's location in the unit square of its frame.
    pub fn point(self) -> Point {
        match self {
            SelectionHandle::TopLeft => Point::new(0.0, 0.0),
            SelectionHandle::Top => Point::new(0.5, 0.0),
            SelectionHandle::TopRight => Point::new(1.0, 0.0),
            SelectionHandle::Left => Point::new(0.0, 0.5),
            SelectionHandle::Right => Point::new(1.0, 0.5),
            SelectionHandle::BottomLeft => Point::new(0.0, 1.0),
            SelectionHandle::Bottom => Point::new(0.5, 1.0),
            SelectionHandle::BottomRight => Point::new(1.0, 1.0),
        }
    }

    /// Mirror across the vertical axis (left <-> right).
    pub fn mirror_horizontal(self) -> Self {
        match self {
            SelectionHandle::TopLeft => SelectionHandle::TopRight,
            SelectionHandle::TopRight => SelectionHandle::TopLeft,
            SelectionHandle::Left => SelectionHandle::Right,
            SelectionHandle::Right => SelectionHandle::Left,
            SelectionHandle::BottomLeft => SelectionHandle::BottomRight,
            SelectionHandle::BottomRight => SelectionHandle::BottomLeft,
            other => other,
        }
    }

    /// Mirror across the horizontal axis (top <-> bottom).
    pub fn mirror_vertical(self) -> Self {
        match self {
            SelectionHandle::TopLeft => SelectionHandle::BottomLeft,
            SelectionHandle::Top => SelectionHandle::Bottom,
            SelectionHandle::TopRight => SelectionHandle::BottomRight,
            SelectionHandle::BottomLeft => SelectionHandle::TopLeft,
            SelectionHandle::Bottom => SelectionHandle::Top,
            SelectionHandle::BottomRight => SelectionHandle::TopRight,
            other => other,
        }
    }

    /// The unit-square point that stays fixed while this handle is dragged.
    pub fn anchor(self) -> Point {
        self.mirror_vertical().mirror_horizontal().point()
    }

    /// Sign of this handle's contribution to the frame width:
    /// -1 for left-side handles, 1 for right-side handles, 0 otherwise.
    pub fn horizontal_sign(self) -> f64 {
        match self {
            SelectionHandle::TopLeft | SelectionHandle::Left | SelectionHandle::BottomLeft => -1.0,
            SelectionHandle::TopRight | SelectionHandle::Right | SelectionHandle::BottomRight => 1.0,
            SelectionHandle::Top | SelectionHandle::Bottom => 0.0,
        }
    }

    /// Sign of this handle's contribution to the frame height:
    /// -1 for top handles, 1 for bottom handles, 0 otherwise.
    pub fn vertical_sign(self) -> f64 {
        match self {
            SelectionHandle::TopLeft | SelectionHandle::Top | SelectionHandle::TopRight => -1.0,
            SelectionHandle::BottomLeft | SelectionHandle::Bottom | SelectionHandle::BottomRight => 1.0,
            SelectionHandle::Left | SelectionHandle::Right => 0.0,
        }
    }

    /// Cursor shown while hovering or dragging this handle.
    pub fn cursor(self) -> CursorHint {
        match self {
            SelectionHandle::TopLeft | SelectionHandle::BottomRight => {
                CursorHint::Resize(ResizeAxis::NorthWestSouthEast)
            }
            SelectionHandle::TopRight | SelectionHandle::BottomLeft => {
                CursorHint::Resize(ResizeAxis::NorthEastSouthWest)
            }
            SelectionHandle::Top | SelectionHandle::Bottom => CursorHint::Resize(ResizeAxis::Vertical),
            SelectionHandle::Left | SelectionHandle::Right => CursorHint::Resize(ResizeAxis::Horizontal),
        }
    }

    /// Position of this handle on a concrete frame.
    pub fn position_on(self, frame: Rect) -> Point {
        let unit = self.point();
        Point::new(
            frame.x0 + frame.width() * unit.x,
            frame.y0 + frame.height() * unit.y,
        )
    }
}

/// Direction of a resize cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeAxis {
    NorthWestSouthEast,
    NorthEastSouthWest,
    Vertical,
    Horizontal,
}

/// Pointer affordance suggested to the host after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorHint {
    #[default]
    Arrow,
    /// Hovering something already selected (grabbable).
    OpenHand,
    /// Dragging a selection.
    ClosedHand,
    /// Hovering a selectable but unselected layer.
    PointingHand,
    /// Hovering or dragging a resize handle.
    Resize(ResizeAxis),
}

/// Screen-space geometry of one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleFrame {
    pub handle: SelectionHandle,
    /// The drawn glyph.
    pub visible: Rect,
    /// The region that accepts the pointer (larger than the glyph).
    pub hit: Rect,
}

/// Compute the eight handle frames for a screen-space selection frame.
///
/// Both rectangles are centred on the handle's point so that they keep a
/// constant screen size regardless of zoom.
pub fn handle_frames(frame: Rect, visible_size: f64, hit_size: f64) -> Vec<HandleFrame> {
    SelectionHandle::ALL
        .iter()
        .map(|&handle| {
            let center = handle.position_on(frame);
            HandleFrame {
                handle,
                visible: Rect::from_center_size(center, Size::new(visible_size, visible_size)),
                hit: Rect::from_center_size(center, Size::new(hit_size, hit_size)),
            }
        })
        .collect()
}

/// Find the first handle whose hit region contains `point`.
pub fn hit_test_handles(frame: Rect, hit_size: f64, point: Point) -> Option<SelectionHandle> {
    handle_frames(frame, hit_size, hit_size)
        .into_iter()
        .find(|h| h.hit.contains(point))
        .map(|h| h.handle)
}
