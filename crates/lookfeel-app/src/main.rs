//! Main application entry point.

use clap::Parser;
use lookfeel_app::{Args, run};
use lookfeel_core::Layer;

fn main() {
    env_logger::init();
    log::info!("Starting Look & Feel replay");

    let args = Args::parse();
    match run(&args) {
        Ok(outcome) => {
            for layer in outcome.canvas.scene.layers() {
                log::info!(
                    "{} '{}': {:?}",
                    layer.id(),
                    layer.name(),
                    layer.bounds().map(|b| (b.x0, b.y0, b.width(), b.height()))
                );
            }
            log::info!(
                "Replayed {} event(s), {} redraw(s), {} draw command(s), selection {:?}",
                outcome.events,
                outcome.redraws,
                outcome.commands,
                outcome
                    .canvas
                    .scene
                    .selected_layers()
                    .map(Layer::name)
                    .collect::<Vec<_>>()
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
