use crate::catalog::DurationCatalog;
use crate::error::ConfigError;
use crate::format::TimeFormat;
use crate::start_times::FloorPolicy;
use chrono::NaiveDateTime;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "dtpick";
const CONFIG_FILE_NAME: &str = "config.toml";
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Host-supplied picker configuration. Immutable once the picker is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Raw comma separated list of allowed durations in minutes.
    #[serde(default)]
    pub interval_spec: Option<String>,
    #[serde(default)]
    pub time_format: TimeFormat,
    #[serde(default = "PickerConfig::default_to_current_time")]
    pub default_to_current_time: bool,
    #[serde(default)]
    pub initial_event_date: Option<NaiveDateTime>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            interval_spec: None,
            time_format: TimeFormat::default(),
            default_to_current_time: true,
            initial_event_date: None,
        }
    }
}

impl PickerConfig {
    const fn default_to_current_time() -> bool {
        true
    }

    pub fn duration_catalog(&self) -> DurationCatalog {
        DurationCatalog::parse(self.interval_spec.as_deref())
    }

    pub fn floor_policy(&self) -> FloorPolicy {
        FloorPolicy::from_default_to_current_time(self.default_to_current_time)
    }
}

/// Overrides sourced from runtime inputs (CLI flags, GUI form edits).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PickerOverrides {
    pub interval_spec: Option<String>,
    pub time_format: Option<TimeFormat>,
    pub default_to_current_time: Option<bool>,
    pub initial_event_date: Option<NaiveDateTime>,
}

impl PickerOverrides {
    pub fn is_empty(&self) -> bool {
        self.interval_spec.is_none()
            && self.time_format.is_none()
            && self.default_to_current_time.is_none()
            && self.initial_event_date.is_none()
    }
}

/// Layer `overrides` on top of a loaded picker configuration.
pub fn apply_overrides(config: &mut PickerConfig, overrides: &PickerOverrides) {
    if let Some(spec) = overrides.interval_spec.as_ref() {
        config.interval_spec = Some(spec.clone());
    }
    if let Some(format) = overrides.time_format {
        config.time_format = format;
    }
    if let Some(default_now) = overrides.default_to_current_time {
        config.default_to_current_time = default_now;
    }
    if let Some(start) = overrides.initial_event_date {
        config.initial_event_date = Some(start);
    }
}

/// GUI-only preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default = "UiPreferences::default_show_notification_log")]
    pub show_notification_log: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            theme: ThemePreference::Dark,
            show_notification_log: true,
        }
    }
}

impl UiPreferences {
    const fn default_show_notification_log() -> bool {
        true
    }
}

/// Theme preference options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub ui: UiPreferences,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            picker: PickerConfig::default(),
            ui: UiPreferences::default(),
        }
    }
}

impl FileConfig {
    const fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

/// Path to the configuration directory.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`.
pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the configuration from the default location, falling back to defaults.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

/// Load the configuration from `path`. Problems are reported as warnings, never errors.
pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

/// Persist the configuration to the default location.
pub fn save_config(config: &FileConfig) -> Result<(), ConfigError> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn sanitize_config(config: FileConfig) -> (FileConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if config.schema_version != CURRENT_SCHEMA_VERSION {
        warnings.push(format!(
            "Unknown config schema version {}. Resetting to {}.",
            config.schema_version, CURRENT_SCHEMA_VERSION
        ));
        return (FileConfig::default(), warnings);
    }

    // Unusable tokens stay in the spec; the catalog drops them at runtime.
    let (catalog, rejected) =
        DurationCatalog::parse_with_rejects(config.picker.interval_spec.as_deref());
    if !rejected.is_empty() {
        warnings.push(format!(
            "Interval spec contains unusable tokens that will be ignored: {}",
            rejected
                .iter()
                .map(|token| format!("'{token}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if catalog.is_empty() {
        warnings.push(
            "Interval spec yields no durations; end times will be unavailable.".to_string(),
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_picker_config_defaults() {
        let config = PickerConfig::default();
        assert!(config.default_to_current_time);
        assert_eq!(config.time_format, TimeFormat::TwelveHour);
        assert_eq!(config.duration_catalog().minutes(), &[30]);
        assert_eq!(config.floor_policy(), FloorPolicy::CurrentTime);
    }

    #[test]
    fn test_apply_overrides_only_touches_set_fields() {
        let mut config = PickerConfig {
            interval_spec: Some("15".to_string()),
            ..PickerConfig::default()
        };
        let overrides = PickerOverrides {
            time_format: Some(TimeFormat::TwentyFourHour),
            default_to_current_time: Some(false),
            ..PickerOverrides::default()
        };
        assert!(!overrides.is_empty());
        assert!(PickerOverrides::default().is_empty());

        apply_overrides(&mut config, &overrides);
        assert_eq!(config.interval_spec.as_deref(), Some("15"));
        assert_eq!(config.time_format, TimeFormat::TwentyFourHour);
        assert!(!config.default_to_current_time);
        assert_eq!(config.initial_event_date, None);
    }

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [picker]
            interval_spec = "15,30,60"
            time_format = "0"
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.picker.time_format, TimeFormat::TwentyFourHour);
        assert!(config.picker.default_to_current_time);
        assert_eq!(config.ui, UiPreferences::default());
    }

    #[test]
    fn test_load_config_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let result = load_config_from(&temp.path().join("absent.toml"));
        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.is_empty());
        assert_eq!(result.config, FileConfig::default());
    }

    #[test]
    fn test_load_config_bad_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "picker = [ this is not toml").unwrap();

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn test_sanitize_reports_dropped_tokens() {
        let mut config = FileConfig::default();
        config.picker.interval_spec = Some("15,abc,30".to_string());

        let (sanitized, warnings) = sanitize_config(config.clone());
        assert_eq!(sanitized, config);
        assert!(warnings.iter().any(|w| w.contains("'abc'")));
    }

    #[test]
    fn test_sanitize_wrong_schema_version() {
        let mut config = FileConfig::default();
        config.schema_version = 7;
        config.picker.interval_spec = Some("90".to_string());

        let (sanitized, warnings) = sanitize_config(config);
        assert_eq!(sanitized, FileConfig::default());
        assert!(warnings.iter().any(|w| w.contains("schema version")));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = FileConfig::default();
        config.picker.interval_spec = Some("20,40".to_string());
        config.picker.default_to_current_time = false;
        config.picker.initial_event_date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0);
        config.ui.theme = ThemePreference::Light;

        save_config_to(&path, &config).unwrap();
        let loaded = load_config_from(&path);
        assert_eq!(loaded.source, ConfigSource::File);
        assert_eq!(loaded.config, config);
    }
}
