use serde::{Deserialize, Serialize};
use std::{
    env, fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::ConfigError;

/// Environment variable overriding the application home directory.
pub const HOME_ENV_VAR: &str = "SMART_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".smart_budget";

/// Stores user-configurable preferences for the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_undo_window_secs")]
    pub undo_window_secs: u64,
    #[serde(default = "Config::default_warning_threshold_percent")]
    pub warning_threshold_percent: f64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the shopping list document. Defaults to `<home>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            undo_window_secs: Self::default_undo_window_secs(),
            warning_threshold_percent: Self::default_warning_threshold_percent(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_undo_window_secs() -> u64 {
        5
    }

    pub fn default_warning_threshold_percent() -> f64 {
        80.0
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
    }

    /// Application home: `$SMART_BUDGET_HOME`, falling back to `~/.smart_budget`.
    pub fn app_home() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV_VAR) {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Directory holding the shopping list document, `<home>/data` unless overridden.
    pub fn resolve_data_root(&self, home: &Path) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        home.join("data")
    }

    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Locale => self.locale.clone(),
            ConfigKey::Currency => self.currency.clone(),
            ConfigKey::UndoWindowSecs => self.undo_window_secs.to_string(),
            ConfigKey::WarningThresholdPercent => format!("{}", self.warning_threshold_percent),
            ConfigKey::UiColorEnabled => on_off(self.ui_color_enabled).into(),
            ConfigKey::DataRoot => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
        }
    }

    /// Parses `value` for `key` and stores it. Leaves the config untouched on error.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            ConfigKey::Locale => self.locale = require_text(key, value)?,
            ConfigKey::Currency => self.currency = require_text(key, value)?.to_uppercase(),
            ConfigKey::UndoWindowSecs => {
                let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.name(),
                    reason: "expected a whole number of seconds".into(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.name(),
                        reason: "must be at least 1 second".into(),
                    });
                }
                self.undo_window_secs = secs;
            }
            ConfigKey::WarningThresholdPercent => {
                let percent: f64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.name(),
                    reason: "expected a number".into(),
                })?;
                if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.name(),
                        reason: "must be between 0 and 100".into(),
                    });
                }
                self.warning_threshold_percent = percent;
            }
            ConfigKey::UiColorEnabled => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.name(),
                            reason: "expected on or off".into(),
                        })
                    }
                }
            }
            ConfigKey::DataRoot => {
                self.data_root = if value.is_empty() || value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    /// Rejects values `set` would never produce, such as a hand-edited file with a
    /// zero undo window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_text(ConfigKey::Locale, &self.locale)?;
        require_text(ConfigKey::Currency, &self.currency)?;
        if self.undo_window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: ConfigKey::UndoWindowSecs.name(),
                reason: "must be at least 1 second".into(),
            });
        }
        let percent = self.warning_threshold_percent;
        if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
            return Err(ConfigError::InvalidValue {
                key: ConfigKey::WarningThresholdPercent.name(),
                reason: "must be between 0 and 100".into(),
            });
        }
        Ok(())
    }

    /// Every setting as `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        ConfigKey::ALL
            .iter()
            .map(|key| (key.name(), self.get(*key)))
            .collect()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn require_text(key: ConfigKey, value: &str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.name(),
            reason: "must not be empty".into(),
        });
    }
    Ok(value.to_string())
}

/// Names of the user-editable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Locale,
    Currency,
    UndoWindowSecs,
    WarningThresholdPercent,
    UiColorEnabled,
    DataRoot,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Locale,
        ConfigKey::Currency,
        ConfigKey::UndoWindowSecs,
        ConfigKey::WarningThresholdPercent,
        ConfigKey::UiColorEnabled,
        ConfigKey::DataRoot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Locale => "locale",
            ConfigKey::Currency => "currency",
            ConfigKey::UndoWindowSecs => "undo_window_secs",
            ConfigKey::WarningThresholdPercent => "warning_threshold_percent",
            ConfigKey::UiColorEnabled => "ui_color_enabled",
            ConfigKey::DataRoot => "data_root",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownKey(value.trim().to_string()))
    }
}
