//! Bound host fields: the outputs the host reads and the values it can push back.

use dtpick_core::{
    Clock, HostValues, Picker, PickerOutputs, parse_duration_minutes, parse_timestamp,
};

use crate::ui_state::UiState;

/// Render the outputs grid and the host push form. Returns a description of a
/// host update, if one was pushed.
pub fn render<C: Clock>(
    ui: &mut egui::Ui,
    picker: &mut Picker<C>,
    ui_state: &mut UiState,
    notifications: usize,
) -> Option<String> {
    ui.heading("Host");
    render_outputs(ui, &picker.outputs(), notifications);

    ui.separator();
    ui.label("Push bound values to the picker:");

    let mut action = None;
    ui.horizontal(|ui| {
        ui.label("eventdate");
        ui.add(
            egui::TextEdit::singleline(&mut ui_state.host_date_input)
                .hint_text("YYYY-MM-DDTHH:MM")
                .desired_width(150.0),
        );
        ui.label("duration");
        ui.add(
            egui::TextEdit::singleline(&mut ui_state.host_duration_input)
                .hint_text("minutes")
                .desired_width(60.0),
        );

        if ui.button("Push").clicked() {
            match parse_host_inputs(&ui_state.host_date_input, &ui_state.host_duration_input) {
                Ok((changed, _)) if changed.is_empty() => {
                    ui_state.host_error = Some("Enter an event date or a duration.".to_string());
                }
                Ok((changed, values)) => {
                    ui_state.host_error = None;
                    let notified = picker.on_host_values_updated(&changed, values);
                    action = Some(format!(
                        "Host pushed {} ({})",
                        changed.join(", "),
                        if notified { "outputs changed" } else { "no change" }
                    ));
                }
                Err(err) => ui_state.host_error = Some(err),
            }
        }
    });

    if let Some(err) = ui_state.host_error.as_ref() {
        ui.colored_label(egui::Color32::RED, err);
    }

    action
}

fn render_outputs(ui: &mut egui::Ui, outputs: &PickerOutputs, notifications: usize) {
    let blank = || "undefined".to_string();
    egui::Grid::new("host_outputs")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("eventdate");
            ui.monospace(
                outputs
                    .event_start
                    .map(|start| start.to_string())
                    .unwrap_or_else(blank),
            );
            ui.end_row();

            ui.label("eventenddate");
            ui.monospace(
                outputs
                    .event_end
                    .map(|end| end.to_string())
                    .unwrap_or_else(blank),
            );
            ui.end_row();

            ui.label("duration");
            ui.monospace(
                outputs
                    .duration_minutes
                    .map(|minutes| minutes.to_string())
                    .unwrap_or_else(blank),
            );
            ui.end_row();

            ui.label("notifications");
            ui.monospace(notifications.to_string());
            ui.end_row();
        });
}

/// Interpret the host form. Blank inputs are not reported as changed.
fn parse_host_inputs(
    date_input: &str,
    duration_input: &str,
) -> Result<(Vec<&'static str>, HostValues), String> {
    let mut changed = Vec::new();
    let mut values = HostValues::default();

    if !date_input.trim().is_empty() {
        values.event_date = Some(parse_timestamp(date_input).map_err(|err| err.to_string())?);
        changed.push("eventdate");
    }
    if !duration_input.trim().is_empty() {
        values.duration =
            Some(parse_duration_minutes(duration_input).map_err(|err| err.to_string())?);
        changed.push("duration");
    }

    Ok((changed, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_blank_host_inputs_change_nothing() {
        let (changed, values) = parse_host_inputs("  ", "").unwrap();
        assert!(changed.is_empty());
        assert_eq!(values, HostValues::default());
    }

    #[test]
    fn test_host_inputs_parse_both_fields() {
        let (changed, values) = parse_host_inputs("2024-06-01T09:15", "45").unwrap();
        assert_eq!(changed, vec!["eventdate", "duration"]);
        assert_eq!(
            values.event_date,
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 15, 0)
        );
        assert_eq!(values.duration, Some(45));
    }

    #[test]
    fn test_bad_duration_is_reported() {
        let err = parse_host_inputs("", "-10").unwrap_err();
        assert!(err.contains("-10"));
    }
}
