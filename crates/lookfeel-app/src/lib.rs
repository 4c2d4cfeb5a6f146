//! Look & Feel App
//!
//! Headless shell: loads a canvas configuration and a gesture script,
//! replays the gestures through the canvas and paints the final frame.

mod args;
mod replay;

pub use args::Args;
pub use replay::{ReplayError, ReplayOutcome, ReplayResult, demo_canvas, parse_script, replay, run};
