use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::fetch::RetryPolicy;
use crate::fetch::retry::{DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS};

pub const DEFAULT_URL: &str = "http://srv.msk01.gigacorp.local/_stats";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub retry: RetryConfig,
    pub watch: WatchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: DEFAULT_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            enabled: false,
            interval_ms: 60_000,
        }
    }
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(&'static str),
    #[error("logging.level {0:?} is not a level or `target=level` list")]
    LogLevel(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be greater than 0"));
        }
        if self.source.url.is_empty() {
            return Err(ConfigError::Invalid("source.url must not be empty"));
        }
        if self.watch.enabled && self.watch.interval_ms == 0 {
            return Err(ConfigError::Invalid("watch.interval_ms must be greater than 0"));
        }
        if !is_valid_log_level(&self.logging.level) {
            return Err(ConfigError::LogLevel(self.logging.level.clone()));
        }
        Ok(())
    }
}

/// Accepts `warn` or `statwatch=debug,warn`: every directive must end in a level.
/// A bare word is otherwise read by `EnvFilter` as a target, which would
/// silently disable all output.
fn is_valid_log_level(level: &str) -> bool {
    !level.trim().is_empty()
        && level.split(',').all(|directive| {
            let level = directive.rsplit('=').next().unwrap_or(directive);
            level.trim().parse::<LevelFilter>().is_ok()
        })
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("statwatch").join("config.toml"))
}

/// Loads the default config file if there is one.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.source.url, DEFAULT_URL);
        assert_eq!(config.source.timeout_ms, 10_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 2000);
        assert!(!config.watch.enabled);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[retry]
max_attempts = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        // Other fields should be defaults
        assert_eq!(config.retry.delay_ms, 2000);
        assert_eq!(config.source.url, DEFAULT_URL);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[source]
url = "http://localhost:8080/_stats"
timeout_ms = 500

[retry]
max_attempts = 1
delay_ms = 0

[watch]
enabled = true
interval_ms = 15000

[logging]
level = "debug"
format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.url, "http://localhost:8080/_stats");
        assert_eq!(config.source.timeout(), Duration::from_millis(500));
        assert_eq!(config.retry.policy(), RetryPolicy::new(1, Duration::ZERO));
        assert!(config.watch.enabled);
        assert_eq!(config.watch.interval(), Duration::from_secs(15));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_interval_only_matters_in_watch_mode() {
        let mut config = Config::default();
        config.watch.interval_ms = 0;
        assert!(config.validate().is_ok());
        config.watch.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn retry_defaults_match_policy_defaults() {
        assert_eq!(RetryConfig::default().policy(), RetryPolicy::default());
    }

    #[test]
    fn log_levels_and_directives_are_accepted() {
        for level in ["warn", "DEBUG", "off", "statwatch=debug", "statwatch=trace,warn"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "{level}");
        }
    }

    #[test]
    fn mistyped_log_level_is_invalid() {
        for level in ["verbos", "", "statwatch", "statwatch=loud", "warn,"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::LogLevel(_))),
                "{level}"
            );
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config_from_path(Path::new("/nonexistent/path/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let temp = std::env::temp_dir().join("statwatch_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let err = load_config_from_path(&temp).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_file(&temp);
    }
}
