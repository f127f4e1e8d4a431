use clap::Parser;

mod app;
mod event;
mod settings;

use app::App;
use settings::Settings;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let settings = Settings::parse();
    log::info!("starting with {} grid", settings.size);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.surface + 16.0, settings.surface + 48.0])
            .with_resizable(false)
            .with_title("Maze Solver"),
        ..Default::default()
    };

    eframe::run_native(
        "Maze Solver",
        native_options,
        Box::new(move |cc| Box::new(App::new(cc, settings))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the window: {}", e))
}
