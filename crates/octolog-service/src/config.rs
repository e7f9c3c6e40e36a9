//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source store settings.
    pub storage: StorageConfig,
    /// Partition archive settings.
    pub archive: ArchiveConfig,
    /// Drain loop settings.
    pub drain: DrainConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Archive directory is not empty
    /// - Poll interval is within reasonable bounds (10s - 1 hour)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.storage.validate());
        errors.extend(self.archive.validate());
        errors.extend(self.drain.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Source store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: octolog_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "database path cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Partition archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory the partition files are written to.
    pub dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: default_archive_dir(),
        }
    }
}

impl ArchiveConfig {
    /// Validate archive configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "archive.dir".to_string(),
                message: "archive directory cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Drain loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrainConfig {
    /// Seconds between drain cycles.
    pub poll_interval: u64,
}

/// Minimum poll interval in seconds (10 seconds).
pub const MIN_POLL_INTERVAL: u64 = 10;
/// Maximum poll interval in seconds (1 hour).
pub const MAX_POLL_INTERVAL: u64 = 3600;

impl Default for DrainConfig {
    fn default() -> Self {
        Self { poll_interval: 240 }
    }
}

impl DrainConfig {
    /// Validate drain configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.poll_interval < MIN_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "drain.poll_interval".to_string(),
                message: format!(
                    "poll interval {} is too short (minimum {} seconds)",
                    self.poll_interval, MIN_POLL_INTERVAL
                ),
            });
        } else if self.poll_interval > MAX_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "drain.poll_interval".to_string(),
                message: format!(
                    "poll interval {} is too long (maximum {} seconds / 1 hour)",
                    self.poll_interval, MAX_POLL_INTERVAL
                ),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `drain.poll_interval`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("octolog")
        .join("service.toml")
}

/// Default partition archive directory.
pub fn default_archive_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("octolog")
        .join("archive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.drain.poll_interval, 240);
        assert_eq!(config.storage.path, octolog_store::default_db_path());
        assert_eq!(config.archive.dir, default_archive_dir());
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let config = Config {
            storage: StorageConfig {
                path: PathBuf::from("/tmp/test.db"),
            },
            archive: ArchiveConfig {
                dir: PathBuf::from("/tmp/archive"),
            },
            drain: DrainConfig { poll_interval: 30 },
        };

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(loaded.storage.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(loaded.archive.dir, PathBuf::from("/tmp/archive"));
        assert_eq!(loaded.drain.poll_interval, 30);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_full_toml() {
        let toml = r#"
            [storage]
            path = "/data/octolog.db"

            [archive]
            dir = "/data/archive"

            [drain]
            poll_interval = 120
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/data/octolog.db"));
        assert_eq!(config.archive.dir, PathBuf::from("/data/archive"));
        assert_eq!(config.drain.poll_interval, 120);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [drain]
            poll_interval = 60
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.drain.poll_interval, 60);
        assert_eq!(config.storage.path, octolog_store::default_db_path());
    }

    #[test]
    fn test_poll_interval_bounds() {
        let short = DrainConfig { poll_interval: 5 };
        let errors = short.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("too short"));

        let long = DrainConfig {
            poll_interval: 7200,
        };
        let errors = long.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("too long"));

        let ok = DrainConfig { poll_interval: 240 };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn test_empty_paths_rejected() {
        let config = Config {
            storage: StorageConfig {
                path: PathBuf::new(),
            },
            archive: ArchiveConfig {
                dir: PathBuf::new(),
            },
            drain: DrainConfig::default(),
        };

        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::Validation(errors)) = result {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().any(|e| e.field == "storage.path"));
            assert!(errors.iter().any(|e| e.field == "archive.dir"));
        }
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError {
            field: "drain.poll_interval".to_string(),
            message: "too short".to_string(),
        };
        assert_eq!(format!("{}", error), "drain.poll_interval: too short");
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("octolog/service.toml"));
    }
}
