//! Runtime configuration from environment variables.
//!
//! | variable            | default                         |
//! |---------------------|---------------------------------|
//! | `DAYBOOK_DB`        | `daybook.db`                    |
//! | `DAYBOOK_LOG_LEVEL` | `debug` (debug) / `info` (release) |
//! | `DAYBOOK_LOG_DIR`   | unset: file logging disabled    |

use crate::logging::{default_log_level, normalize_level};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "DAYBOOK_DB";
pub const LOG_LEVEL_VAR: &str = "DAYBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "DAYBOOK_LOG_DIR";

const DEFAULT_DB_PATH: &str = "daybook.db";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaybookConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl DaybookConfig {
    /// Loads from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        match var(DB_PATH_VAR) {
            Some(path) => config.db_path = PathBuf::from(path),
            None => info!("{DB_PATH_VAR} not set, using default: {DEFAULT_DB_PATH}"),
        }

        if let Some(level) = var(LOG_LEVEL_VAR) {
            config.log_level = normalize_level(&level).map_err(|err| {
                warn!("Invalid {LOG_LEVEL_VAR} value: {err}");
                ConfigError::Invalid {
                    key: LOG_LEVEL_VAR,
                    message: err.to_string(),
                }
            })?;
        }

        if let Some(dir) = var(LOG_DIR_VAR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    key: LOG_DIR_VAR,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DaybookConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> Result<DaybookConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        DaybookConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, DaybookConfig::default());
        assert_eq!(config.db_path, PathBuf::from("daybook.db"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let log_dir = std::env::temp_dir().join("daybook-config-test");
        let config = load(&[
            (DB_PATH_VAR, "/var/lib/daybook/notes.db"),
            (LOG_LEVEL_VAR, "Warning"),
            (LOG_DIR_VAR, log_dir.to_str().unwrap()),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/daybook/notes.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = load(&[(DB_PATH_VAR, "   "), (LOG_LEVEL_VAR, "")]).unwrap();
        assert_eq!(config, DaybookConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let level = load(&[(LOG_LEVEL_VAR, "loud")]).unwrap_err();
        assert!(matches!(level, ConfigError::Invalid { key, .. } if key == LOG_LEVEL_VAR));

        let dir = load(&[(LOG_DIR_VAR, "relative/logs")]).unwrap_err();
        assert!(dir.to_string().contains(LOG_DIR_VAR));
    }
}
