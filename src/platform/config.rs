// MyRent - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::analytics::AnalyticsConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for MyRent data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/myrent/ or %APPDATA%\MyRent\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the SQLite database.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default database location inside the data directory.
    pub fn default_database_path(&self) -> PathBuf {
        self.data_dir.join(constants::DATABASE_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[import]` section.
    pub import: ImportSection,
    /// `[analytics]` section.
    pub analytics: AnalyticsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// SQLite database file (empty = platform data directory).
    pub database_path: Option<String>,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Largest import file accepted, in bytes.
    pub max_file_size_bytes: Option<u64>,
}

/// `[analytics]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalyticsSection {
    /// Condo share of total cost that triggers a warning insight.
    pub condo_warning_share: Option<f64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Storage --
    /// Explicit database path; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    // -- Import --
    pub max_import_file_size: u64,

    // -- Analytics --
    pub analytics: AnalyticsConfig,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            max_import_file_size: constants::DEFAULT_MAX_IMPORT_FILE_SIZE,
            analytics: AnalyticsConfig::default(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning so the
/// user is informed while the command still runs.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source,
            };
            tracing::warn!(error = %err, "Could not read config file; using defaults");
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let (config, mut parse_warnings) = parse_config(&content, &config_path);
    if parse_warnings.is_empty() {
        tracing::info!(path = %config_path.display(), "Loaded config.toml");
    } else {
        tracing::warn!(
            path = %config_path.display(),
            count = parse_warnings.len(),
            "Config validation produced warnings"
        );
    }
    warnings.append(&mut parse_warnings);
    (config, warnings)
}

/// Parse and validate config.toml content read from `path`.
pub fn parse_config(content: &str, path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: path.to_path_buf(),
                source,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Storage: database_path --
    if let Some(ref db_path) = raw.storage.database_path {
        if !db_path.trim().is_empty() {
            config.database_path = Some(PathBuf::from(db_path));
        }
    }

    // -- Import: max_file_size_bytes --
    if let Some(size) = raw.import.max_file_size_bytes {
        if (constants::MIN_MAX_IMPORT_FILE_SIZE..=constants::ABSOLUTE_MAX_IMPORT_FILE_SIZE)
            .contains(&size)
        {
            config.max_import_file_size = size;
        } else {
            warnings.push(out_of_range(
                "[import] max_file_size_bytes",
                size,
                format!(
                    "{}-{}",
                    constants::MIN_MAX_IMPORT_FILE_SIZE,
                    constants::ABSOLUTE_MAX_IMPORT_FILE_SIZE
                ),
                constants::DEFAULT_MAX_IMPORT_FILE_SIZE,
            ));
        }
    }

    // -- Analytics: condo_warning_share --
    if let Some(share) = raw.analytics.condo_warning_share {
        if share > 0.0 && share < 1.0 {
            config.analytics.condo_warning_share = share;
        } else {
            warnings.push(out_of_range(
                "[analytics] condo_warning_share",
                share,
                "0-1, exclusive".to_string(),
                constants::DEFAULT_CONDO_WARNING_SHARE,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(out_of_range(
                "[logging] level",
                level,
                "one of error, warn, info, debug, trace".to_string(),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

fn out_of_range(
    field: &str,
    value: impl std::fmt::Display,
    expected: String,
    default: impl std::fmt::Display,
) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    };
    format!("{err}. Using default ({default}).")
}
