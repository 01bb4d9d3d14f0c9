//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./other.db                                                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SOLAR_QUOTE_DATABASE_PATH=/data/solar.db                           │
//! │     SOLAR_QUOTE_ARCHIVE_PAGE_SIZE=50                                   │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/solar-quote/solar-quote.toml (Linux)                     │
//! │     ~/Library/Application Support/com.solar.quote/solar-quote.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # solar-quote.toml
//! database_path = "/srv/solar/solar-quote.db"
//! max_connections = 5
//! log_filter = "info,solar=debug,sqlx=warn"
//! archive_page_size = 20
//! company_name = "Solar Quote"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

/// Default `EnvFilter` directive when neither `RUST_LOG` nor the config
/// file sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,solar=debug,sqlx=warn";

const CONFIG_FILE_NAME: &str = "solar-quote.toml";
const DATABASE_FILE_NAME: &str = "solar-quote.db";
const ENV_PREFIX: &str = "SOLAR_QUOTE";

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Pool size passed to `DbConfig`.
    pub max_connections: u32,

    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it.
    pub log_filter: String,

    /// Default `--limit` for `archive list`.
    pub archive_page_size: u32,

    /// Printed above every rendered quote.
    pub company_name: String,
}

impl AppConfig {
    /// Loads configuration from defaults, file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`explicit_file` must exist; the default one may not)
    /// 3. `SOLAR_QUOTE_*` environment variables
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, ConfigError> {
        let dirs = project_dirs();
        let default_db = dirs
            .as_ref()
            .map(|d| d.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME));

        let mut builder = Config::builder()
            .set_default("database_path", default_db.to_string_lossy().into_owned())?
            .set_default("max_connections", 5_i64)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .set_default("archive_page_size", 20_i64)?
            .set_default("company_name", "Solar Quote")?;

        match explicit_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                debug!(?path, "Loading config file");
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(dirs) = &dirs {
                    let path = dirs.config_dir().join(CONFIG_FILE_NAME);
                    debug!(?path, "Looking for default config file");
                    builder = builder.add_source(
                        File::from(path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("database_path".into()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be greater than 0".into(),
            ));
        }
        if self.archive_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "archive_page_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Creates the database file's parent directory if needed.
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::DataDir(parent.to_path_buf(), e))?;
            }
        }
        Ok(())
    }
}

/// Platform-specific directories for Solar Quote.
///
/// - **Linux**: `~/.config/solar-quote`, `~/.local/share/solar-quote`
/// - **macOS**: `~/Library/Application Support/com.solar.quote`
/// - **Windows**: `%APPDATA%\solar\quote`
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "solar", "quote")
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not create data directory {}: {}", .0.display(), .1)]
    DataDir(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("solar-quote-{}.toml", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let path = temp_file(
            r#"
            database_path = "/tmp/solar-test.db"
            archive_page_size = 50
            company_name = "SolarTec"
            "#,
        );
        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.database_path, PathBuf::from("/tmp/solar-test.db"));
        assert_eq!(config.archive_page_size, 50);
        assert_eq!(config.company_name, "SolarTec");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", Uuid::new_v4()));
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let path = temp_file("archive_page_size = 0\n");
        let result = AppConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_defaults_like_config() {
        let config = AppConfig {
            database_path: PathBuf::from("solar-quote.db"),
            max_connections: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            archive_page_size: 20,
            company_name: "Solar Quote".to_string(),
        };
        assert!(config.validate().is_ok());
        assert!(config.ensure_data_dir().is_ok());
    }
}
