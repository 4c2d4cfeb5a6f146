//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "lookfeel", about = "Replay input gestures against a demo canvas")]
pub struct Args {
    /// Canvas configuration file (JSON). Defaults are used when absent.
    #[arg(long, env = "LOOKFEEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gesture script: a JSON array of input events.
    #[arg(long)]
    pub script: Option<PathBuf>,
}
