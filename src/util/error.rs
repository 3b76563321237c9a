// MyRent - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all MyRent operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum MyRentError {
    /// An import run failed; nothing was persisted.
    Import(ImportError),

    /// The record store rejected an operation.
    Store(StoreError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for MyRentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Store(e) => write!(f, "Storage error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for MyRentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Import(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors that abort an import run. Filtered and duplicate rows are not
/// errors; they only show up as counts in the summary.
#[derive(Debug)]
pub enum ImportError {
    /// The file kind is not one of the recognised tabular or backup kinds.
    UnsupportedFormat { name: String },

    /// The backup JSON parsed, but its root is not an array.
    MalformedBackup,

    /// No usable data rows remain after the header row.
    EmptyData,

    /// The backup payload is not valid JSON.
    InvalidJson { source: serde_json::Error },

    /// The CSV payload could not be read.
    Csv { source: csv::Error },

    /// The spreadsheet payload could not be opened or has no worksheet.
    Spreadsheet { reason: String },

    /// The import file exceeds the configured size limit.
    FileTooLarge { path: PathBuf, size: u64, max_size: u64 },

    /// I/O error reading the import file.
    Io { path: PathBuf, source: io::Error },

    /// The final bulk insert failed; the store holds nothing from this run.
    StorageWrite { source: StoreError },

    /// Reading the existing address snapshot failed.
    Store { source: StoreError },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { name } => write!(
                f,
                "'{name}' is not a supported file. Use XLSX, CSV (spreadsheet) or JSON (backup)."
            ),
            Self::MalformedBackup => {
                write!(f, "Invalid JSON backup: expected an array of properties")
            }
            Self::EmptyData => write!(f, "The file appears to be empty"),
            Self::InvalidJson { source } => write!(f, "Invalid JSON backup: {source}"),
            Self::Csv { source } => write!(f, "Could not read CSV: {source}"),
            Self::Spreadsheet { reason } => write!(f, "Could not read spreadsheet: {reason}"),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
            Self::StorageWrite { source } => {
                write!(f, "Failed to save imported properties: {source}")
            }
            Self::Store { source } => {
                write!(f, "Failed to read existing properties: {source}")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::StorageWrite { source } => Some(source),
            Self::Store { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ImportError> for MyRentError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by a `PropertyStore` implementation.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite rejected a statement.
    Sqlite {
        operation: &'static str,
        source: rusqlite::Error,
    },

    /// A column value could not be encoded or decoded.
    Serialize {
        field: &'static str,
        source: serde_json::Error,
    },

    /// No record exists with the given id.
    NotFound { id: i64 },

    /// The record has no id, so it cannot address a stored row.
    MissingId,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite { operation, source } => {
                write!(f, "SQLite error during {operation}: {source}")
            }
            Self::Serialize { field, source } => {
                write!(f, "Cannot encode column '{field}': {source}")
            }
            Self::NotFound { id } => write!(f, "No property with id {id}"),
            Self::MissingId => write!(f, "Property has no id"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for MyRentError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to backup and template export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// Workbook generation error.
    Xlsx { source: rust_xlsxwriter::XlsxError },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Json { source } => write!(f, "JSON export error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Xlsx { source } => write!(f, "Workbook export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Xlsx { source } => Some(source),
        }
    }
}

impl From<ExportError> for MyRentError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for MyRentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for MyRent results.
pub type Result<T> = std::result::Result<T, MyRentError>;
