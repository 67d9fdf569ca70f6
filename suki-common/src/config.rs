//! Configuration loading and root folder resolution
//!
//! Two-tier configuration:
//! 1. **TOML Bootstrap**: database path, logging (static, bootstrap only)
//! 2. **Database Runtime**: engine settings from the `settings` table
//!
//! Root folder resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SUKI_ROOT_FOLDER` environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SUKI_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "suki.db";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The process must restart to
/// pick up changes to the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to SQLite database file (relative or absolute)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Root folder for Suki data (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load the TOML bootstrap config from `path`.
    ///
    /// A missing file is not an error: the engine starts with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
}

/// Resolve the root folder using the 4-tier priority order.
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("suki"))
        .unwrap_or_else(|| PathBuf::from("./suki_data"))
}

/// Default TOML config file location for the platform
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("suki").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("suki.toml"))
}

/// Resolve the database path: explicit override wins, otherwise
/// `<root_folder>/suki.db`.
pub fn resolve_database_path(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = &overrides.database_path {
        return path.clone();
    }
    if let Some(path) = &toml_config.database_path {
        return path.clone();
    }
    let root = resolve_root_folder(overrides.root_folder.as_deref(), toml_config);
    root.join(DATABASE_FILE_NAME)
}

/// Runtime engine settings loaded from the `settings` table
///
/// All values have built-in defaults. Missing database values are initialized
/// with defaults and written back for consistency.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Role assigned to transactions no rule matches. Empty string disables
    /// the fallback: unmatched transactions stay unresolved and get no row.
    pub fallback_role: String,

    /// Result rows written per batch flush
    pub batch_flush_size: usize,

    /// Scoring worker threads (0 = one per CPU core)
    pub worker_threads: usize,
}

impl EngineSettings {
    pub const DEFAULT_FALLBACK_ROLE: &'static str = "";
    pub const DEFAULT_BATCH_FLUSH_SIZE: usize = 500;
    pub const DEFAULT_WORKER_THREADS: usize = 0;

    /// Load runtime settings from the database.
    ///
    /// For each setting: read from the `settings` table; if missing, use the
    /// built-in default and write it back.
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let fallback_role =
            get_setting(pool, "fallback_role", Self::DEFAULT_FALLBACK_ROLE.to_string()).await?;
        let batch_flush_size: usize =
            get_setting(pool, "batch_flush_size", Self::DEFAULT_BATCH_FLUSH_SIZE.to_string())
                .await?
                .parse()
                .map_err(|e| Error::Config(format!("Invalid batch_flush_size: {}", e)))?;
        let worker_threads: usize =
            get_setting(pool, "worker_threads", Self::DEFAULT_WORKER_THREADS.to_string())
                .await?
                .parse()
                .map_err(|e| Error::Config(format!("Invalid worker_threads: {}", e)))?;

        if batch_flush_size == 0 {
            return Err(Error::Config("batch_flush_size must be > 0".to_string()));
        }

        Ok(Self {
            fallback_role,
            batch_flush_size,
            worker_threads,
        })
    }

    /// Fallback role as an option: `None` when disabled.
    pub fn fallback_role_opt(&self) -> Option<&str> {
        let trimmed = self.fallback_role.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Read a setting, writing the default back when the key is missing.
async fn get_setting(pool: &SqlitePool, key: &str, default: String) -> Result<String> {
    let value_opt: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match value_opt {
        Some((value,)) => Ok(value),
        None => {
            info!("Setting '{}' not found in database, using default: '{}'", key, default);
            sqlx::query(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
            )
            .bind(key)
            .bind(&default)
            .execute(pool)
            .await?;
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_default_root_folder_nonempty() {
        let folder = default_root_folder();
        assert!(!folder.as_os_str().is_empty());
    }

    #[test]
    fn test_fallback_role_opt() {
        let mut settings = EngineSettings {
            fallback_role: String::new(),
            batch_flush_size: 500,
            worker_threads: 0,
        };
        assert_eq!(settings.fallback_role_opt(), None);

        settings.fallback_role = "  ".to_string();
        assert_eq!(settings.fallback_role_opt(), None);

        settings.fallback_role = "Regular".to_string();
        assert_eq!(settings.fallback_role_opt(), Some("Regular"));
    }

    #[test]
    fn test_toml_parse() {
        let raw = r#"
            database_path = "/tmp/suki.db"

            [logging]
            level = "debug"
        "#;
        let config: TomlConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/suki.db")));
        assert_eq!(config.logging.level, "debug");
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_toml_parse_empty() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert!(config.database_path.is_none());
        assert_eq!(config.logging.level, "info");
    }
}
