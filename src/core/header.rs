// MyRent - core/header.rs
//
// Header-row location for tabular sources.

use crate::core::model::Cell;
use crate::util::constants::HEADER_ROW_MARKERS;

/// Index of the first row holding a text cell whose upper-cased form
/// contains one of `HEADER_ROW_MARKERS`. Returns 0 when nothing matches;
/// a file without a recognisable header then fails later, on emptiness.
pub fn locate_header_row(rows: &[Vec<Cell>]) -> usize {
    rows.iter()
        .position(|row| row.iter().any(is_header_marker))
        .unwrap_or(0)
}

fn is_header_marker(cell: &Cell) -> bool {
    cell.as_text().is_some_and(|text| {
        let upper = text.to_uppercase();
        HEADER_ROW_MARKERS
            .iter()
            .any(|marker| upper.contains(marker))
    })
}
