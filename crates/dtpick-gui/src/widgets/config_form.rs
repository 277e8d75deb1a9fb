//! Configuration form widget

use dtpick_core::{DurationCatalog, TimeFormat};

use crate::state::AppState;
use crate::ui_state::UiState;

/// Render the configuration form.
/// Returns true if any picker setting was changed.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, ui_state: &mut UiState) -> bool {
    ui.vertical(|ui| {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Durations:")
                .on_hover_text("Comma separated minutes, e.g. 15,30,60");
            let response = ui.add(
                egui::TextEdit::singleline(&mut ui_state.interval_input)
                    .hint_text("30")
                    .desired_width(160.0),
            );
            if !response.has_focus() && !response.lost_focus() {
                ui_state.interval_input = state
                    .config
                    .picker
                    .interval_spec
                    .clone()
                    .unwrap_or_default();
            }
            if response.lost_focus() {
                let spec = ui_state.interval_input.trim();
                let spec = (!spec.is_empty()).then(|| spec.to_string());
                if spec != state.config.picker.interval_spec {
                    state.config.picker.interval_spec = spec;
                    changed = true;
                }
            }
        });

        let (catalog, rejected) =
            DurationCatalog::parse_with_rejects(state.config.picker.interval_spec.as_deref());
        if !rejected.is_empty() {
            ui.colored_label(
                egui::Color32::YELLOW,
                format!("Ignored: {}", rejected.join(", ")),
            );
        }
        if catalog.is_empty() {
            ui.colored_label(egui::Color32::YELLOW, "No usable durations; end times are disabled.");
        }

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Time format:");
            let current = state.config.picker.time_format;
            egui::ComboBox::from_id_salt("time_format")
                .selected_text(time_format_label(current))
                .show_ui(ui, |ui| {
                    for format in [TimeFormat::TwelveHour, TimeFormat::TwentyFourHour] {
                        if ui
                            .selectable_value(
                                &mut state.config.picker.time_format,
                                format,
                                time_format_label(format),
                            )
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
        });

        ui.add_space(8.0);

        if ui
            .checkbox(
                &mut state.config.picker.default_to_current_time,
                "Earliest start is the current time",
            )
            .on_hover_text("When off, start times begin at 08:00")
            .changed()
        {
            changed = true;
        }

        changed
    })
    .inner
}

fn time_format_label(format: TimeFormat) -> &'static str {
    match format {
        TimeFormat::TwelveHour => "12-hour",
        TimeFormat::TwentyFourHour => "24-hour",
    }
}
