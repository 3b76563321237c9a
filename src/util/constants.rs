// MyRent - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "MyRent";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "MyRent";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Import limits
// =============================================================================

/// Default upper bound on the size of a file accepted for import.
pub const DEFAULT_MAX_IMPORT_FILE_SIZE: u64 = 20 * 1024 * 1024; // 20 MB

/// Smallest user-configurable import size limit.
pub const MIN_MAX_IMPORT_FILE_SIZE: u64 = 1024;

/// Hard upper bound on the import size limit (prevents configuration mistakes).
pub const ABSOLUTE_MAX_IMPORT_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Upper-cased substrings that identify the header row of a spreadsheet.
/// Exports often prepend title/metadata rows of unpredictable length.
pub const HEADER_ROW_MARKERS: &[&str] = &["ENDEREÇO", "ALUGUEL"];

/// Title given to an imported row that carries neither type nor location.
pub const PLACEHOLDER_TITLE: &str = "Imóvel Importado";

/// Exact cell value of the balcony column that produces the balcony tag.
pub const BALCONY_YES: &str = "Sim";

/// Tag added when the balcony column reads `BALCONY_YES`.
pub const BALCONY_TAG: &str = "Varanda";

// =============================================================================
// Analytics
// =============================================================================

/// Bucket label for records without a region in the region histogram.
pub const REGION_NOT_INFORMED: &str = "Não Informado";

/// Bucket label for records without a region in scatter and per-region metrics.
pub const REGION_OTHER: &str = "Outros";

/// Default condo share of total cost above which a warning insight fires.
pub const DEFAULT_CONDO_WARNING_SHARE: f64 = 0.30;

/// Scale of the normalised radar axes.
pub const RADAR_SCALE: f64 = 100.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Export
// =============================================================================

/// Prefix of backup file names (`myrent_backup_<YYYY-MM-DD>.json`).
pub const BACKUP_FILE_PREFIX: &str = "myrent_backup_";

/// Default file name of the blank spreadsheet template.
pub const TEMPLATE_FILE_NAME: &str = "modelo_imoveis.xlsx";

/// Worksheet name inside the template workbook.
pub const TEMPLATE_SHEET_NAME: &str = "Modelo";

/// Header row written to the template, in column order.
pub const TEMPLATE_HEADERS: &[&str] = &[
    "Região Administrativa",
    "ENDEREÇO",
    "TIPO",
    "QTD QUARTOS",
    "QTD BANHEIROS",
    "área total MT²",
    "VARANDA",
    "LAZER",
    "ACESSIBILIDADE",
    "METRÔ",
    "ALUGUEL",
    "CONDOMÍNIO",
    "IPTU",
    "RESIDENCIAL",
    "CONTATO",
    "Link",
];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// SQLite database file name (stored in the platform data directory).
pub const DATABASE_FILE_NAME: &str = "myrent.sqlite3";
