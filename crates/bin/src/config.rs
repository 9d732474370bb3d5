//! Runtime settings.
//!
//! Read from the environment (after loading an optional `.env` file) with a
//! platform-specific default database location:
//! - Linux: `~/.local/share/fremantle/fremantle.db`
//! - macOS: `~/Library/Application Support/fremantle/fremantle.db`
//! - Windows: `%APPDATA%\fremantle\fremantle.db`

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub(crate) const DB_PATH_VAR: &str = "FREMANTLE_DB_PATH";
pub(crate) const PRICE_DELAY_VAR: &str = "FREMANTLE_PRICE_DELAY_MS";
pub(crate) const PRICE_CONCURRENCY_VAR: &str = "FREMANTLE_PRICE_CONCURRENCY";
pub(crate) const LOG_FORMAT_VAR: &str = "FREMANTLE_LOG_FORMAT";

const DEFAULT_PRICE_DELAY_MS: u64 = 1000;
const DEFAULT_PRICE_CONCURRENCY: usize = 4;

/// Invalid setting.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} must be at least 1")]
    Zero { key: &'static str },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) db_path: PathBuf,
    pub(crate) price_delay: Duration,
    pub(crate) price_concurrency: usize,
    pub(crate) log_format: LogFormat,
}

/// Default database directory.
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fremantle")
}

impl Settings {
    /// Load from the process environment. `db_override` wins over
    /// `FREMANTLE_DB_PATH`.
    pub(crate) fn from_env(db_override: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), db_override)
    }

    pub(crate) fn from_lookup<F>(lookup: F, db_override: Option<&Path>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = db_override.map_or_else(
            || get(DB_PATH_VAR).map_or_else(|| default_data_dir().join("fremantle.db"), PathBuf::from),
            Path::to_path_buf,
        );

        let price_delay_ms = match get(PRICE_DELAY_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: PRICE_DELAY_VAR,
                value: raw,
            })?,
            None => DEFAULT_PRICE_DELAY_MS,
        };

        let price_concurrency = match get(PRICE_CONCURRENCY_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| ConfigError::Invalid {
                key: PRICE_CONCURRENCY_VAR,
                value: raw,
            })?,
            None => DEFAULT_PRICE_CONCURRENCY,
        };
        if price_concurrency == 0 {
            return Err(ConfigError::Zero {
                key: PRICE_CONCURRENCY_VAR,
            });
        }

        let log_format = match get(LOG_FORMAT_VAR).map(|v| v.trim().to_lowercase()) {
            None => LogFormat::Text,
            Some(v) if v == "text" => LogFormat::Text,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: LOG_FORMAT_VAR,
                    value: v,
                });
            }
        };

        Ok(Self {
            db_path,
            price_delay: Duration::from_millis(price_delay_ms),
            price_concurrency,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], db: Option<&Path>) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned(), db)
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[], None).unwrap();
        assert!(settings.db_path.ends_with("fremantle/fremantle.db"));
        assert_eq!(settings.price_delay, Duration::from_millis(1000));
        assert_eq!(settings.price_concurrency, 4);
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_environment_values() {
        let settings = load(
            &[
                (DB_PATH_VAR, "/tmp/reits.db"),
                (PRICE_DELAY_VAR, "250"),
                (PRICE_CONCURRENCY_VAR, "8"),
                (LOG_FORMAT_VAR, "JSON"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(settings.db_path, PathBuf::from("/tmp/reits.db"));
        assert_eq!(settings.price_delay, Duration::from_millis(250));
        assert_eq!(settings.price_concurrency, 8);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_override_wins() {
        let settings = load(&[(DB_PATH_VAR, "/tmp/reits.db")], Some(Path::new("local.db"))).unwrap();
        assert_eq!(settings.db_path, PathBuf::from("local.db"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[(PRICE_DELAY_VAR, "soon")], None),
            Err(ConfigError::Invalid { key: PRICE_DELAY_VAR, .. })
        ));
        assert!(matches!(
            load(&[(PRICE_CONCURRENCY_VAR, "0")], None),
            Err(ConfigError::Zero { .. })
        ));
        assert!(matches!(
            load(&[(LOG_FORMAT_VAR, "xml")], None),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
