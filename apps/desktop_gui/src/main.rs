mod backend_bridge;
mod controller;
mod ui;

use std::path::Path;

use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::ConverterApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut settings = client_core::load_settings(None);
    if settings.output_dir == Path::new(".") {
        if let Some(downloads) = dirs::download_dir() {
            settings.output_dir = downloads;
        }
    }
    let server_url = settings.server_url.clone();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("DICOM Converter")
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([480.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "DICOM Converter",
        options,
        Box::new(move |_cc| Ok(Box::new(ConverterApp::new(cmd_tx, ui_rx, &server_url)))),
    )
}
