//! Runtime configuration read from environment variables.
//!
//! The shell has no flags, so the environment is the only knob:
//! - `HOSPITAL_DB_PATH`: database file (default `hospital.db`).
//! - `HOSPITAL_LOG_DIR`: absolute log directory (default `<cwd>/logs`).
//! - `HOSPITAL_LOG_LEVEL`: `trace|debug|info|warn|error` (default per build).

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_VAR: &str = "HOSPITAL_DB_PATH";
pub const LOG_DIR_VAR: &str = "HOSPITAL_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "HOSPITAL_LOG_LEVEL";

const DEFAULT_DB_FILE: &str = "hospital.db";
const DEFAULT_LOG_SUBDIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Working directory is unreadable, so the default log dir is unknown.
    CurrentDir(String),
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(message) => {
                write!(f, "cannot resolve working directory for default paths: {message}")
            }
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_VAR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Process configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|err| ConfigError::CurrentDir(err.to_string()))?;
        Self::from_lookup(&cwd, |key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, with relative defaults
    /// anchored at `base_dir`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        let log_dir = match read(LOG_DIR_VAR) {
            Some(value) => {
                let path = PathBuf::from(value.trim());
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(path));
                }
                path
            }
            None => base_dir.join(DEFAULT_LOG_SUBDIR),
        };

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(Path::new("/srv/hospital"), lookup_from(&[])).unwrap();

        assert_eq!(config.db_path, PathBuf::from("hospital.db"));
        assert_eq!(config.log_dir, PathBuf::from("/srv/hospital/logs"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(
            Path::new("/srv/hospital"),
            lookup_from(&[
                (DB_PATH_VAR, "/data/ward.db"),
                (LOG_DIR_VAR, "/var/log/hospital"),
                (LOG_LEVEL_VAR, "WARNING"),
            ]),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/ward.db"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/hospital"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(
            Path::new("/srv/hospital"),
            lookup_from(&[(DB_PATH_VAR, "  "), (LOG_LEVEL_VAR, "")]),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("hospital.db"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn current_dir_error_names_the_cause() {
        let err = ConfigError::CurrentDir("No such file or directory".to_string());
        assert_eq!(
            err.to_string(),
            "cannot resolve working directory for default paths: No such file or directory"
        );
    }

    #[test]
    fn from_env_resolves_default_log_dir_under_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        let config = AppConfig::from_env().unwrap();
        if std::env::var(LOG_DIR_VAR).map_or(true, |value| value.trim().is_empty()) {
            assert_eq!(config.log_dir, cwd.join("logs"));
        }
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let err = AppConfig::from_lookup(
            Path::new("/srv/hospital"),
            lookup_from(&[(LOG_LEVEL_VAR, "loud")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));

        let err = AppConfig::from_lookup(
            Path::new("/srv/hospital"),
            lookup_from(&[(LOG_DIR_VAR, "logs")]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs")));
    }
}
