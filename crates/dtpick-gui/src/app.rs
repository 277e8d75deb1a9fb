//! Main application structure for the picker demo host

use chrono::Local;
use dtpick_core::ConfigSource;
use tracing::{info, warn};

use crate::state::AppState;
use crate::ui_state::{LogEntry, LogLevel, Theme, UiState};
use crate::widgets;

/// Main application struct implementing eframe::App
pub struct DtpickApp {
    state: AppState,
    ui_state: UiState,
}

impl DtpickApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_state(AppState::new())
    }

    pub fn with_state(mut state: AppState) -> Self {
        let ui_state = UiState::new(state.config.ui.theme, state.config.ui.show_notification_log);
        let warnings = std::mem::take(&mut state.load_warnings);
        let source = state.config_source;

        let mut app = Self { state, ui_state };
        for warning in warnings {
            warn!(%warning, "Configuration warning");
            app.add_log(LogLevel::Warning, warning);
        }
        app.add_log(
            LogLevel::Info,
            match source {
                ConfigSource::File => "Picker initialized from config.toml",
                ConfigSource::Default => "Picker initialized with default settings",
            },
        );
        app
    }

    fn add_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.ui_state.add_log_entry(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.ui_state.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        };
        ctx.set_visuals(visuals);
    }

    /// Turn notifications delivered since the last frame into log entries.
    fn drain_notifications(&mut self) {
        let fresh = self.state.take_notifications();
        if fresh == 0 {
            return;
        }
        let outputs = self.state.outputs();
        let fmt = |value: Option<String>| value.unwrap_or_else(|| "undefined".to_string());
        self.add_log(
            LogLevel::Notify,
            format!(
                "Outputs changed: eventdate={} eventenddate={} duration={}",
                fmt(outputs.event_start.map(|v| v.to_string())),
                fmt(outputs.event_end.map(|v| v.to_string())),
                fmt(outputs.duration_minutes.map(|v| v.to_string())),
            ),
        );
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Event time picker");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.ui_state.theme {
                        Theme::Dark => "Light mode",
                        Theme::Light => "Dark mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.ui_state.theme = match self.ui_state.theme {
                            Theme::Dark => Theme::Light,
                            Theme::Light => Theme::Dark,
                        };
                        self.state.config.ui.theme = self.ui_state.theme.into();
                        self.ui_state.config_dirty = true;
                    }
                });
            });
        });
    }

    fn render_main_ui(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Picker").strong());
            if let Some(action) =
                widgets::picker::render(ui, &mut self.state.picker, &mut self.ui_state)
            {
                info!(%action, "User edit");
                self.add_log(LogLevel::Info, action);
            }
            if ui.button("Refresh start times").clicked() {
                let notified = self.state.picker.refresh();
                self.add_log(
                    LogLevel::Info,
                    format!("Candidate lists rebuilt (notified: {notified})"),
                );
            }
        });

        ui.add_space(8.0);

        ui.group(|ui| {
            let notifications = self.state.total_notifications();
            if let Some(action) = widgets::host_panel::render(
                ui,
                &mut self.state.picker,
                &mut self.ui_state,
                notifications,
            ) {
                self.add_log(LogLevel::Info, action);
            }
        });

        ui.add_space(8.0);

        egui::CollapsingHeader::new("Settings")
            .default_open(false)
            .show(ui, |ui| {
                if widgets::config_form::render(ui, &mut self.state, &mut self.ui_state) {
                    self.ui_state.config_dirty = true;
                    self.state.reinitialize_keeping_start();
                    self.add_log(LogLevel::Info, "Picker reinitialized with new settings");
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let save = ui.add_enabled(self.ui_state.config_dirty, egui::Button::new("Save"));
                    if save.clicked() {
                        match self.state.save_config() {
                            Ok(()) => {
                                self.ui_state.config_dirty = false;
                                self.add_log(LogLevel::Info, "Configuration saved");
                            }
                            Err(e) => {
                                self.add_log(LogLevel::Error, format!("Failed to save config: {e}"));
                            }
                        }
                    }
                    if ui.button("Reset picker").clicked() {
                        self.state.initialize_picker();
                        self.add_log(LogLevel::Info, "Picker reinitialized");
                    }
                });
            });

        ui.add_space(8.0);

        let log = egui::CollapsingHeader::new("Notification log")
            .default_open(self.ui_state.notification_log_expanded)
            .show(ui, |ui| {
                widgets::notification_log::render(ui, &mut self.ui_state);
            });
        self.ui_state.notification_log_expanded = log.fully_open();
    }
}

impl eframe::App for DtpickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        self.render_top_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_main_ui(ui);
            });
        });

        self.drain_notifications();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.picker.teardown();
    }
}
