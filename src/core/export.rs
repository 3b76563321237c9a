// MyRent - core/export.rs
//
// Backup export and the blank import template.
// Core layer: writes to any Write trait object or returns bytes; the
// caller decides where they land.

use crate::core::model::PropertyRecord;
use crate::util::constants::{BACKUP_FILE_PREFIX, TEMPLATE_HEADERS, TEMPLATE_SHEET_NAME};
use crate::util::error::ExportError;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use std::path::Path;

/// Export records as an indented JSON array. The output is itself a valid
/// backup payload for re-import.
pub fn export_backup<W: Write>(
    records: &[PropertyRecord],
    writer: W,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|source| ExportError::Json { source })?;
    Ok(records.len())
}

/// `myrent_backup_<YYYY-MM-DD>.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// A workbook with one sheet holding only the canonical header row.
pub fn template_xlsx_bytes() -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(TEMPLATE_SHEET_NAME)
        .map_err(|source| ExportError::Xlsx { source })?;

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|source| ExportError::Xlsx { source })?;
    }

    workbook
        .save_to_buffer()
        .map_err(|source| ExportError::Xlsx { source })
}

/// The template header row as a one-line CSV.
pub fn write_template_csv<W: Write>(writer: W, export_path: &Path) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(TEMPLATE_HEADERS)
        .map_err(|source| ExportError::Csv { source })?;
    csv_writer.flush().map_err(|source| ExportError::Io {
        path: export_path.to_path_buf(),
        source,
    })
}
