//! Tracing subscriber setup for connector processes.
//!
//! Stdout always gets a layer (plain or JSON). When a log directory is
//! configured, a daily rolling JSON file is added, plus a separate
//! `errors.jsonl` stream for events logged with `target: "errors"`.

use crate::config::Config;
use dsc_error::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_LEVEL_SETTING: &str = "dsc.log.level";
pub const LOG_JSON_SETTING: &str = "dsc.log.json";
pub const LOG_DIRECTORY_SETTING: &str = "dsc.log.directory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

impl LoggingSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            level: config.get_string_or(LOG_LEVEL_SETTING, "info"),
            json: config.get_bool_or(LOG_JSON_SETTING, false)?,
            directory: config.get_string_opt(LOG_DIRECTORY_SETTING),
        })
    }
}

/// Installs the global subscriber. Returns `false` when one was already set.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    let stdout_layer = if settings.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let file_layers = settings.directory.as_ref().map(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory {}: {}", dir, e);
        }
        let connector_appender = tracing_appender::rolling::daily(dir, "connector.jsonl");
        let errors_appender = tracing_appender::rolling::daily(dir, "errors.jsonl");

        let connector_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(connector_appender);
        let errors_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(errors_appender)
            .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                metadata.target() == "errors"
            }));
        connector_layer.and_then(errors_layer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layers)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = crate::config::from_map([
            (LOG_LEVEL_SETTING, "debug"),
            (LOG_JSON_SETTING, "true"),
            (LOG_DIRECTORY_SETTING, "/var/log/dsc"),
        ]);
        let settings = LoggingSettings::from_config(&config).unwrap();
        assert_eq!(settings.level, "debug");
        assert!(settings.json);
        assert_eq!(settings.directory.as_deref(), Some("/var/log/dsc"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = LoggingSettings::from_config(&crate::config::empty()).unwrap();
        assert_eq!(settings, LoggingSettings::default());
    }

    #[test]
    fn test_invalid_json_flag() {
        let config = crate::config::from_map([(LOG_JSON_SETTING, "maybe")]);
        assert!(LoggingSettings::from_config(&config).is_err());
    }
}
