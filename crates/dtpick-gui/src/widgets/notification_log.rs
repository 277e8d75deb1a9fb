//! Notification log widget

use crate::ui_state::{LogLevel, UiState};

pub fn render(ui: &mut egui::Ui, ui_state: &mut UiState) {
    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.label("Entries:");
            ui.label(format!("{} / 200", ui_state.notification_log.len()));

            if ui.button("Clear").clicked() {
                ui_state.notification_log.clear();
            }
        });

        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(240.0)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &ui_state.notification_log {
                    ui.horizontal(|ui| {
                        ui.label(&entry.timestamp);

                        let (color, prefix) = match entry.level {
                            LogLevel::Info => (egui::Color32::GRAY, "INFO"),
                            LogLevel::Notify => (egui::Color32::LIGHT_GREEN, "NOTIFY"),
                            LogLevel::Warning => (egui::Color32::YELLOW, "WARN"),
                            LogLevel::Error => (egui::Color32::RED, "ERROR"),
                        };

                        ui.colored_label(color, prefix);
                        ui.label(&entry.message);
                    });
                }
            });
    });
}
