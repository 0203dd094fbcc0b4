#![deny(missing_docs)]

//! Entry point for the DATAHUB console.
use datahub::config::{self, AppSettings};
use datahub::egui_app::controller::EguiController;
use datahub::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use datahub::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, load_error) = match config::load_or_default() {
        Ok(settings) => (settings, None),
        Err(err) => (AppSettings::default(), Some(err.to_string())),
    };

    match logging::init(&settings.logging.level) {
        Ok(path) => tracing::info!("Logging to {}", path.display()),
        Err(err) => eprintln!("Logging disabled: {err}"),
    }
    if let Some(err) = &load_error {
        tracing::warn!("Using default settings: {err}");
    }
    let config_path = match config::config_path() {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::warn!("Settings will not be saved: {err}");
            None
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_title("DATAHUB")
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(1280.0, 820.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "DATAHUB",
        native_options,
        Box::new(move |cc| {
            let mut controller = EguiController::new(settings, config_path);
            if let Some(err) = load_error {
                controller.set_status(
                    format!("Using default settings: {err}"),
                    datahub::egui_app::ui::style::StatusTone::Warning,
                );
            }
            Ok(Box::new(EguiApp::new(&cc.egui_ctx, controller)))
        }),
    )?;
    Ok(())
}
