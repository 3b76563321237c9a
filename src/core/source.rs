// MyRent - core/source.rs
//
// Source-kind detection and raw payload parsing.
// Core layer: accepts byte slices, never touches the filesystem directly.
//
// Tabular payloads (CSV or spreadsheet workbooks) become rows of typed
// cells; backup payloads become a list of JSON objects.

use crate::core::fields::RowFields;
use crate::core::model::Cell;
use crate::util::error::ImportError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::Value;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

// =============================================================================
// Source kinds
// =============================================================================

/// Container format of a tabular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    /// xlsx / xlsm / xlsb / xls / ods, read through calamine.
    Spreadsheet,
}

/// What an import payload is declared to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Tabular(TabularFormat),
    Backup,
}

impl SourceKind {
    /// Detect the kind from a file name's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(SourceKind::Backup),
            "csv" => Ok(SourceKind::Tabular(TabularFormat::Csv)),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                Ok(SourceKind::Tabular(TabularFormat::Spreadsheet))
            }
            _ => Err(ImportError::UnsupportedFormat {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            }),
        }
    }
}

// =============================================================================
// Tabular parsing
// =============================================================================

/// Parse a tabular payload into rows of cells. Rows keep their source
/// order; trailing cells of short rows are simply absent.
pub fn read_rows(bytes: &[u8], format: TabularFormat) -> Result<Vec<Vec<Cell>>, ImportError> {
    match format {
        TabularFormat::Csv => read_csv_rows(bytes),
        TabularFormat::Spreadsheet => read_spreadsheet_rows(bytes),
    }
}

/// Decode CSV bytes: UTF-8 (BOM stripped) when valid, Windows-1252 otherwise.
/// Spreadsheet tools on Windows still emit the latter for "CSV" saves.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            tracing::debug!("CSV is not valid UTF-8; decoded as Windows-1252");
            decoded
        }
    }
}

/// `;` when it outnumbers `,` on the first non-blank line, else `,`.
fn sniff_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semicolons = first.matches(';').count();
    let commas = first.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ImportError> {
    let text = decode_text(bytes);
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ImportError::Csv { source })?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    tracing::debug!(
        rows = rows.len(),
        delimiter = %char::from(delimiter),
        "CSV rows read"
    );
    Ok(rows)
}

fn read_spreadsheet_rows(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        ImportError::Spreadsheet {
            reason: e.to_string(),
        }
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Spreadsheet {
            reason: "workbook has no worksheet".to_string(),
        })?
        .map_err(|e| ImportError::Spreadsheet {
            reason: e.to_string(),
        })?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    tracing::debug!(rows = rows.len(), "Worksheet rows read");
    Ok(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

/// Turn the rows below `header_index` into header-keyed fields.
///
/// Blank header cells drop their column; a repeated header gets a `_1`,
/// `_2`… suffix; rows without any present cell are skipped.
pub fn rows_to_fields(rows: &[Vec<Cell>], header_index: usize) -> Vec<RowFields> {
    let Some(header_row) = rows.get(header_index) else {
        return Vec::new();
    };
    let headers = column_headers(header_row);

    rows.iter()
        .skip(header_index + 1)
        .filter_map(|row| {
            let fields: RowFields = headers
                .iter()
                .zip(row.iter())
                .filter_map(|(header, cell)| {
                    let header = header.as_ref()?;
                    cell.is_present().then(|| (header.clone(), cell.clone()))
                })
                .collect();
            (!fields.is_empty()).then_some(fields)
        })
        .collect()
}

fn column_headers(header_row: &[Cell]) -> Vec<Option<String>> {
    let mut headers: Vec<Option<String>> = Vec::with_capacity(header_row.len());
    for cell in header_row {
        let name = cell.to_string();
        if name.trim().is_empty() {
            headers.push(None);
            continue;
        }
        let mut unique = name.clone();
        let mut n = 1;
        while headers.iter().flatten().any(|h| *h == unique) {
            unique = format!("{name}_{n}");
            n += 1;
        }
        headers.push(Some(unique));
    }
    headers
}

// =============================================================================
// Backup parsing
// =============================================================================

/// Parse a backup payload into its array elements.
pub fn parse_backup(bytes: &[u8]) -> Result<Vec<Value>, ImportError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let root: Value =
        serde_json::from_slice(bytes).map_err(|source| ImportError::InvalidJson { source })?;
    match root {
        Value::Array(items) => Ok(items),
        _ => Err(ImportError::MalformedBackup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("backup.JSON")).unwrap(),
            SourceKind::Backup
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("Pesquisa.xlsx")).unwrap(),
            SourceKind::Tabular(TabularFormat::Spreadsheet)
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("lista.csv")).unwrap(),
            SourceKind::Tabular(TabularFormat::Csv)
        );
        assert!(matches!(
            SourceKind::from_path(&PathBuf::from("notes.txt")),
            Err(ImportError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            SourceKind::from_path(&PathBuf::from("no_extension")),
            Err(ImportError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_csv_rows_typed() {
        let rows = read_rows(b"ENDERE\xC3\x87O,ALUGUEL\nRua 1,2500\n", TabularFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], text("ENDEREÇO"));
        assert_eq!(rows[1][1], Cell::Number(2500.0));
    }

    #[test]
    fn test_csv_semicolon_and_latin1() {
        // "ENDEREÇO;ALUGUEL" with Ç encoded as 0xC7 (Windows-1252)
        let bytes = b"ENDERE\xC7O;ALUGUEL\nRua 1, casa 2;1800\n";
        let rows = read_rows(bytes, TabularFormat::Csv).unwrap();
        assert_eq!(rows[0][0], text("ENDEREÇO"));
        assert_eq!(rows[1][0], text("Rua 1, casa 2"));
        assert_eq!(rows[1][1], Cell::Number(1800.0));
    }

    #[test]
    fn test_csv_bom_is_stripped() {
        let rows = read_rows(b"\xEF\xBB\xBFIPTU\n10\n", TabularFormat::Csv).unwrap();
        assert_eq!(rows[0][0], text("IPTU"));
    }

    #[test]
    fn test_garbage_spreadsheet_is_an_error() {
        let result = read_rows(b"not a workbook", TabularFormat::Spreadsheet);
        assert!(matches!(result, Err(ImportError::Spreadsheet { .. })));
    }

    #[test]
    fn test_rows_to_fields() {
        let rows = vec![
            vec![text("Relatório")],
            vec![text("ENDEREÇO"), Cell::Empty, text("ALUGUEL"), text("ALUGUEL")],
            vec![text("Rua 1"), text("ignored"), Cell::Number(1000.0), Cell::Number(5.0)],
            vec![Cell::Empty, Cell::Empty],
            vec![text("Rua 2")],
        ];
        let fields = rows_to_fields(&rows, 1);
        assert_eq!(fields.len(), 2);

        let first: Vec<_> = fields[0].iter().collect();
        assert_eq!(
            first,
            vec![
                ("ENDEREÇO", &text("Rua 1")),
                ("ALUGUEL", &Cell::Number(1000.0)),
                ("ALUGUEL_1", &Cell::Number(5.0)),
            ]
        );
        assert_eq!(fields[1].len(), 1);
    }

    #[test]
    fn test_rows_to_fields_header_only() {
        let rows = vec![vec![text("ENDEREÇO"), text("ALUGUEL")]];
        assert!(rows_to_fields(&rows, 0).is_empty());
        assert!(rows_to_fields(&[], 0).is_empty());
    }

    #[test]
    fn test_parse_backup() {
        let items = parse_backup(br#"[{"address":"Rua 1"},{"address":"Rua 2"}]"#).unwrap();
        assert_eq!(items.len(), 2);

        assert!(matches!(
            parse_backup(br#"{"address":"Rua 1"}"#),
            Err(ImportError::MalformedBackup)
        ));
        assert!(matches!(
            parse_backup(b"[{"),
            Err(ImportError::InvalidJson { .. })
        ));
    }
}
