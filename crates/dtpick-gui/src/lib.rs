//! Demo host GUI for the picker using eframe/egui.
//!
//! The window plays the role of the embedding host: it renders the picker's
//! three inputs, shows the bound output fields, lets the user push host values
//! back in and logs every change notification.

pub mod app;
pub mod state;
pub mod ui_state;
pub mod widgets;

use dtpick_core::{LoggingDestination, init_logging};

/// Main entry point for the GUI
pub fn run() -> anyhow::Result<()> {
    if let Err(err) = init_logging(LoggingDestination::FileOnly) {
        eprintln!("Warning: structured logging unavailable: {err}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([520.0, 420.0])
            .with_resizable(true)
            .with_title("Event time picker"),
        ..Default::default()
    };

    eframe::run_native(
        "dtpick",
        native_options,
        Box::new(|cc| Ok(Box::new(app::DtpickApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e:?}"))?;

    Ok(())
}
