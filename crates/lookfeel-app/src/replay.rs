//! Gesture replay against a demo canvas.

use crate::args::Args;
use kurbo::{Point, Rect};
use lookfeel_core::{
    ApproximateMetrics, BezierPoint, Canvas, CanvasConfig, ConfigError, InputEvent, LayerColor,
    Paint, ParagraphAlignment, ShapeLayer, TextLayer, Typography,
};
use lookfeel_render::{RecordingSurface, RenderContext, Renderer, RendererError};
use std::path::Path;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// The state after a replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub canvas: Canvas,
    /// Events fed to the canvas.
    pub events: usize,
    /// Events that asked for a redraw.
    pub redraws: usize,
    /// Draw commands in the final frame.
    pub commands: usize,
}

/// Parse a gesture script: a JSON array of input events.
pub fn parse_script(json: &str) -> ReplayResult<Vec<InputEvent>> {
    Ok(serde_json::from_str(json)?)
}

fn load_script(path: &Path) -> ReplayResult<Vec<InputEvent>> {
    let json = std::fs::read_to_string(path)?;
    parse_script(&json)
}

/// A small scene with every layer kind.
pub fn demo_canvas(config: CanvasConfig) -> Canvas {
    let metrics = ApproximateMetrics::default();
    let mut canvas = Canvas::new(config);

    canvas.scene.add_layer(
        ShapeLayer::new("Background", Rect::new(0.0, 0.0, 400.0, 300.0)).with_paint(Paint {
            fill: LayerColor::new(240, 240, 240, 255),
            stroke: LayerColor::clear(),
            stroke_width: 0.0,
            ..Paint::default()
        }),
    );
    canvas.scene.add_layer(
        ShapeLayer::new("Card", Rect::new(40.0, 40.0, 200.0, 140.0)).with_paint(Paint {
            fill: LayerColor::new(59, 130, 246, 255),
            ..Paint::default()
        }),
    );
    let diamond = vec![
        BezierPoint::corner(Point::new(0.5, 0.0)),
        BezierPoint::corner(Point::new(1.0, 0.5)),
        BezierPoint::corner(Point::new(0.5, 1.0)),
        BezierPoint::corner(Point::new(0.0, 0.5)),
    ];
    canvas.scene.add_layer(
        ShapeLayer::new("Badge", Rect::new(260.0, 60.0, 340.0, 140.0)).with_points(diamond, true),
    );
    canvas.scene.add_layer(TextLayer::new(
        "Title",
        "Look & Feel",
        Point::new(40.0, 180.0),
        Typography {
            font_size: 24.0,
            ..Typography::default()
        },
        &metrics,
    ));
    canvas.scene.add_layer(TextLayer::paragraph(
        "Body",
        "Drag layers around, pull the handles to resize them.",
        Rect::new(40.0, 220.0, 360.0, 280.0),
        Typography {
            alignment: ParagraphAlignment::LeftJustified,
            ..Typography::default()
        },
        &metrics,
    ));
    canvas
}

/// Feed `events` through the canvas. Returns how many asked for a redraw.
pub fn replay(canvas: &mut Canvas, events: &[InputEvent]) -> usize {
    events
        .iter()
        .filter(|event| {
            let response = canvas.handle_input(event);
            log::debug!(
                "{:?} -> {} ({:?})",
                event,
                canvas.controller().drag_state().label(),
                response.cursor
            );
            response.needs_redraw
        })
        .count()
}

/// Load the inputs named by `args`, replay them and paint the final frame.
pub fn run(args: &Args) -> ReplayResult<ReplayOutcome> {
    let config = match &args.config {
        Some(path) => CanvasConfig::load(path)?,
        None => CanvasConfig::default(),
    };
    let events = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let mut canvas = demo_canvas(config);
    let redraws = replay(&mut canvas, &events);

    let mut surface = RecordingSurface::new();
    surface.render(&RenderContext::new(&canvas))?;

    Ok(ReplayOutcome {
        events: events.len(),
        redraws,
        commands: surface.commands().len(),
        canvas,
    })
}
