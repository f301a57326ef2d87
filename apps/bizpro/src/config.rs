//! # Application Configuration
//!
//! Configuration loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BIZPRO_DB_PATH=/data/bizpro.db                                     │
//! │     BIZPRO_LOG=debug                                                   │
//! │     BIZPRO_CURRENCY=UGX                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bizpro/bizpro.toml (Linux)                               │
//! │     ~/Library/Application Support/com.bizpro.bizpro/bizpro.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, KES with 2 decimals                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bizpro.toml
//! [database]
//! path = "/home/me/.local/share/bizpro/bizpro.db"
//! connect_timeout_secs = 30
//!
//! [logging]
//! filter = "info,bizpro=debug,sqlx=warn"
//!
//! [currency]
//! code = "KES"
//! decimals = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use bizpro_db::{DbConfig, IN_MEMORY_PATH};

use crate::error::{ConfigError, ConfigResult};

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,bizpro=debug,sqlx=warn";

/// File name of the ledger database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "bizpro.db";

// =============================================================================
// Database Settings
// =============================================================================

/// Where the ledger lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means `<platform data dir>/bizpro.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long to wait for the connection (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Tracing filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string. `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Currency Settings
// =============================================================================

/// How amounts are displayed. Storage is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code shown before amounts.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Digits after the decimal point.
    #[serde(default = "default_currency_decimals")]
    pub decimals: u8,
}

fn default_currency_code() -> String {
    "KES".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            decimals: default_currency_decimals(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub currency: CurrencySettings,
}

impl AppConfig {
    /// Configuration for a throwaway in-memory ledger.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.path = Some(PathBuf::from(IN_MEMORY_PATH));
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bizpro.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `BIZPRO_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BIZPRO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(filter) = lookup("BIZPRO_LOG") {
            self.logging.filter = filter;
        }

        if let Some(code) = lookup("BIZPRO_CURRENCY") {
            debug!(code = %code, "Overriding currency from environment");
            self.currency.code = code.trim().to_uppercase();
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let code = &self.currency.code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency code must be letters only, got: '{}'",
                code
            )));
        }

        if self.currency.decimals > 6 {
            return Err(ConfigError::Invalid(
                "currency decimals must be at most 6".into(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if matches!(&self.database.path, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("database path is empty".into()));
        }

        Ok(())
    }

    /// Resolves the database path, falling back to the platform data dir.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path().ok_or_else(|| {
                ConfigError::Invalid("could not determine app data directory".into())
            }),
        }
    }

    /// Builds the storage configuration.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs)))
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bizpro", "bizpro")
            .map(|dirs| dirs.config_dir().join("bizpro.toml"))
    }

    fn default_database_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bizpro", "bizpro")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
    }
}
