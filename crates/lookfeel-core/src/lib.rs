//! Look & Feel Core Library
//!
//! Platform-agnostic canvas engine for the Look & Feel design tool: the
//! layer model, selection store, viewport math and the pointer state machine.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod interaction;
pub mod layers;
pub mod notify;
pub mod scene;
pub mod surface;
pub mod text_metrics;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use geometry::{resized_frame, union_bounds};
pub use handles::{CursorHint, HandleFrame, ResizeAxis, SelectionHandle, handle_frames};
pub use input::{InputEvent, Modifiers};
pub use interaction::{DragState, InputResponse, InteractionController};
pub use layers::{
    BezierPoint, Capability, Colorable, CornerStyle, GroupLayer, Layer, LayerColor, LayerId, Paint,
    ParagraphAlignment, Resizable, ShapeLayer, StrokePosition, TextLayer, Traceable, Transformable,
    TypeStyle, Typographic, Typography,
};
pub use notify::{ChangeNotifier, SubscriptionId};
pub use scene::Scene;
pub use surface::{DrawSurface, TextRun};
pub use text_metrics::{ApproximateMetrics, DEFAULT_FONT_NAME, MetricsInbox, TextMetrics};
pub use viewport::Viewport;
