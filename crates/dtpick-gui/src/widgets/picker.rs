//! The three picker inputs: date field, start time and end time selects.

use chrono::Local;
use dtpick_core::{Clock, Picker, parse_date};

use crate::ui_state::UiState;

/// Render the picker. Returns a description of the user edit, if any.
pub fn render<C: Clock>(
    ui: &mut egui::Ui,
    picker: &mut Picker<C>,
    ui_state: &mut UiState,
) -> Option<String> {
    let Some(state) = picker.state() else {
        ui.label("Picker not initialized");
        return None;
    };
    let date_text = picker.date_field().unwrap_or_default();
    let start_options = state.start_options().to_vec();
    let end_options = state.end_options().to_vec();
    let start_labels = picker.start_time_labels();
    let end_labels = picker.end_time_labels();
    let selected_start = picker.selected_start_index();
    let selected_end = picker.selected_end_index();

    let mut action = None;

    egui::Grid::new("picker_inputs")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Date");
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut ui_state.date_input)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(110.0),
                );
                if !response.has_focus() && !response.lost_focus() {
                    ui_state.date_input = date_text.clone();
                }
                if response.lost_focus() {
                    match parse_date(&ui_state.date_input) {
                        Ok(date) => {
                            ui_state.date_error = None;
                            if picker.change_date(date) {
                                action = Some(format!("Date changed to {date}"));
                            }
                        }
                        Err(err) => ui_state.date_error = Some(err.to_string()),
                    }
                }
                if ui.small_button("Today").clicked() {
                    let today = Local::now().date_naive();
                    ui_state.date_error = None;
                    if picker.change_date(today) {
                        action = Some(format!("Date changed to {today}"));
                    }
                }
            });
            ui.end_row();

            ui.label("Start time");
            let mut chosen_start = selected_start;
            egui::ComboBox::from_id_salt("start_time")
                .selected_text(option_text(&start_labels, selected_start))
                .height(320.0)
                .show_ui(ui, |ui| {
                    for (index, label) in start_labels.iter().enumerate() {
                        ui.selectable_value(&mut chosen_start, Some(index), label);
                    }
                });
            if chosen_start != selected_start {
                if let Some(slot) = chosen_start.and_then(|index| start_options.get(index)) {
                    if picker.change_start_time(*slot) {
                        action = Some(format!("Start time changed to {slot}"));
                    }
                }
            }
            ui.end_row();

            ui.label("End time");
            let mut chosen_end = selected_end;
            ui.add_enabled_ui(!end_labels.is_empty(), |ui| {
                egui::ComboBox::from_id_salt("end_time")
                    .selected_text(option_text(&end_labels, selected_end))
                    .show_ui(ui, |ui| {
                        for (index, label) in end_labels.iter().enumerate() {
                            ui.selectable_value(&mut chosen_end, Some(index), label);
                        }
                    });
            });
            if chosen_end != selected_end {
                if let Some(end) = chosen_end.and_then(|index| end_options.get(index)) {
                    if picker.change_end_time(*end) {
                        action = Some(format!("End time changed to {end}"));
                    }
                }
            }
            ui.end_row();
        });

    if let Some(err) = ui_state.date_error.as_ref() {
        ui.colored_label(egui::Color32::RED, err);
    }

    action
}

fn option_text(labels: &[String], selected: Option<usize>) -> String {
    selected
        .and_then(|index| labels.get(index))
        .cloned()
        .unwrap_or_else(|| "(none)".to_string())
}
