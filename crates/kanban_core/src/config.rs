//! Board configuration loading.
//!
//! # Responsibility
//! - Parse `kanban.toml` into typed settings with defaults.
//! - Reject values the core cannot honor before anything is opened.
//!
//! # Invariants
//! - Every section is optional; missing keys take defaults.
//! - A loaded config has a supported log level and non-zero retention.
//!
//! ```toml
//! seed_sample_data = true
//!
//! [storage]
//! database_path = "/home/me/.local/share/kanban/board.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/home/me/.local/state/kanban/logs"
//!
//! [retention]
//! deleted_task_max_age_days = 30
//! ```

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DELETED_TASK_MAX_AGE_DAYS: u32 = 30;
const SUPPORTED_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Errors from reading or validating board configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level board settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Seed one sample task per column on an empty board.
    pub seed_sample_data: bool,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub retention: RetentionConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

/// Where board slots are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite file path; `None` lets the host choose (memory, or the CLI default file).
    pub database_path: Option<PathBuf>,
}

/// Logging bootstrap settings passed to `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory; `None` disables file logging.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Soft-delete retention window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetentionConfig {
    pub deleted_task_max_age_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            deleted_task_max_age_days: DEFAULT_DELETED_TASK_MAX_AGE_DAYS,
        }
    }
}

impl BoardConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Checks cross-field constraints not expressible in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim().to_ascii_lowercase();
        if !SUPPORTED_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level `{}` is not one of trace|debug|info|warn|error",
                self.logging.level
            )));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.retention.deleted_task_max_age_days == 0 {
            return Err(ConfigError::Invalid(
                "retention.deleted_task_max_age_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn empty_text_yields_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert!(config.seed_sample_data);
        assert_eq!(config.retention.deleted_task_max_age_days, 30);
        assert_eq!(config.storage.database_path, None);
    }

    #[test]
    fn sections_override_defaults() {
        let config = BoardConfig::from_toml_str(
            r#"
            seed_sample_data = false

            [storage]
            database_path = "board.sqlite3"

            [logging]
            level = "WARN"

            [retention]
            deleted_task_max_age_days = 7
            "#,
        )
        .unwrap();

        assert!(!config.seed_sample_data);
        assert_eq!(
            config.storage.database_path,
            Some(PathBuf::from("board.sqlite3"))
        );
        assert_eq!(config.logging.level, "WARN");
        assert_eq!(config.retention.deleted_task_max_age_days, 7);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let level = BoardConfig::from_toml_str("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(level, ConfigError::Invalid(_)));

        let retention =
            BoardConfig::from_toml_str("[retention]\ndeleted_task_max_age_days = 0").unwrap_err();
        assert!(matches!(retention, ConfigError::Invalid(_)));

        let unknown = BoardConfig::from_toml_str("[storage]\npath = \"x\"").unwrap_err();
        assert!(matches!(unknown, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, BoardConfig::default());
    }
}
