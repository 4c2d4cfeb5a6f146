//! Renderer trait and the per-frame painting protocol.

use kurbo::Size;
use lookfeel_core::{Canvas, DrawSurface};
use peniko::Color;
use thiserror::Error;

/// Selection box stroke width in screen pixels.
const SELECTION_STROKE_WIDTH: f64 = 1.0;

/// Handle outline width in screen pixels.
const HANDLE_STROKE_WIDTH: f64 = 1.0;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Selection box and handle outline color.
    pub selection_color: Color,
    /// Handle glyph fill.
    pub handle_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a render context sized to the canvas viewport.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            handle_color: Color::from_rgba8(255, 255, 255, 255),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selection color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Reject frames that cannot be painted.
    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RendererError::Surface(format!(
                "invalid viewport size {}x{}",
                width, height
            )));
        }
        let zoom = self.canvas.viewport.zoom;
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(RendererError::RenderFailed(format!("invalid zoom {}", zoom)));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the drawing commands for a frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}

/// Paint one frame of `ctx.canvas` onto `surface`.
///
/// Layers are drawn in z-order under the canvas transform. The selection
/// box and its handles are drawn afterwards in screen space, so they keep a
/// constant size at every zoom.
pub fn paint_frame(ctx: &RenderContext, surface: &mut dyn DrawSurface) -> RenderResult<()> {
    ctx.validate()?;
    let canvas = ctx.canvas;

    surface.clear(ctx.background_color);

    surface.save();
    surface.translate(canvas.viewport.pan_offset);
    surface.scale(canvas.viewport.zoom, canvas.viewport.zoom);
    for layer in canvas.scene.layers() {
        layer.draw(surface);
    }
    surface.restore();

    if let Some(frame) = canvas.selection_screen_frame() {
        surface.stroke_rect(frame, ctx.selection_color, SELECTION_STROKE_WIDTH);
        for handle in canvas.handle_frames() {
            surface.fill_rect(handle.visible, ctx.handle_color);
            surface.stroke_rect(handle.visible, ctx.selection_color, HANDLE_STROKE_WIDTH);
        }
    }

    log::trace!(
        "Painted {} layer(s) at zoom {:.3}",
        canvas.scene.len(),
        canvas.viewport.zoom
    );
    Ok(())
}
