//! Look & Feel Render Library
//!
//! Paints a [`lookfeel_core::Canvas`] onto a draw surface. The recording
//! surface is always available; the Vello surface sits behind the
//! `vello-renderer` feature.

mod recording;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordedCommand, RecordingSurface};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, paint_frame};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
