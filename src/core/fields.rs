// MyRent - core/fields.rs
//
// Canonical field names, the header alias table, and per-row field
// resolution. Header matching is done against trimmed, lower-cased keys
// built once per row; each canonical field tries its aliases in order.

use crate::core::model::Cell;
use std::collections::HashMap;

// =============================================================================
// Canonical fields
// =============================================================================

/// Domain attributes recognised in tabular sources, independent of the
/// header text any particular export uses for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Region,
    Address,
    Kind,
    Bedrooms,
    Bathrooms,
    Area,
    Balcony,
    Leisure,
    Accessibility,
    Metro,
    Rent,
    Condo,
    Iptu,
    Residential,
    Contact,
    ListingUrl,
}

impl CanonicalField {
    pub fn all() -> &'static [CanonicalField] {
        &[
            CanonicalField::Region,
            CanonicalField::Address,
            CanonicalField::Kind,
            CanonicalField::Bedrooms,
            CanonicalField::Bathrooms,
            CanonicalField::Area,
            CanonicalField::Balcony,
            CanonicalField::Leisure,
            CanonicalField::Accessibility,
            CanonicalField::Metro,
            CanonicalField::Rent,
            CanonicalField::Condo,
            CanonicalField::Iptu,
            CanonicalField::Residential,
            CanonicalField::Contact,
            CanonicalField::ListingUrl,
        ]
    }

    /// Header spelling used by the reference spreadsheet layout.
    pub fn canonical_header(&self) -> &'static str {
        match self {
            CanonicalField::Region => "Região Administrativa",
            CanonicalField::Address => "ENDEREÇO",
            CanonicalField::Kind => "TIPO",
            CanonicalField::Bedrooms => "QTD QUARTOS",
            CanonicalField::Bathrooms => "QTD BANHEIROS",
            CanonicalField::Area => "área total MT²",
            CanonicalField::Balcony => "VARANDA",
            CanonicalField::Leisure => "LAZER",
            CanonicalField::Accessibility => "ACESSIBILIDADE",
            CanonicalField::Metro => "METRÔ",
            CanonicalField::Rent => "ALUGUEL",
            CanonicalField::Condo => "CONDOMÍNIO",
            CanonicalField::Iptu => "IPTU",
            CanonicalField::Residential => "RESIDENCIAL",
            CanonicalField::Contact => "CONTATO",
            CanonicalField::ListingUrl => "Link",
        }
    }
}

/// Header normalisation: trim, then lower-case.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// =============================================================================
// Alias table
// =============================================================================

/// Canonical field → ordered list of normalised header variants.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<CanonicalField, Vec<String>>,
}

impl AliasTable {
    /// A table with no aliases at all.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Replace the alias list for `field`. Variants are normalised on entry.
    pub fn set(&mut self, field: CanonicalField, variants: &[&str]) -> &mut Self {
        self.aliases.insert(
            field,
            variants.iter().map(|v| normalize_header(v)).collect(),
        );
        self
    }

    /// Append one more variant, tried after the existing ones.
    pub fn push(&mut self, field: CanonicalField, variant: &str) -> &mut Self {
        self.aliases
            .entry(field)
            .or_default()
            .push(normalize_header(variant));
        self
    }

    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for AliasTable {
    /// Every field matches its canonical header; area and listing URL
    /// carry the extra spellings seen in real exports.
    fn default() -> Self {
        let mut table = Self::empty();
        for field in CanonicalField::all() {
            table.set(*field, &[field.canonical_header()]);
        }
        table.set(
            CanonicalField::Area,
            &["área total mt²", "área total m²", "mt²"],
        );
        table.set(CanonicalField::ListingUrl, &["Link", "URL", "Site", "Anúncio"]);
        table
    }
}

// =============================================================================
// Row fields and resolution
// =============================================================================

/// One data row keyed by the raw header text of its column.
/// Only cells that carry a value are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    cells: Vec<(String, Cell)>,
}

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, cell: Cell) {
        self.cells.push((header.into(), cell));
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c))
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for RowFields {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        let mut row = RowFields::new();
        for (header, cell) in iter {
            row.insert(header, cell);
        }
        row
    }
}

/// Resolves canonical fields against one row.
///
/// The normalised key map is built once in `new`; two raw headers that
/// normalise to the same key resolve to the later column.
#[derive(Debug)]
pub struct FieldResolver<'a> {
    table: &'a AliasTable,
    normalized: HashMap<String, &'a Cell>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(table: &'a AliasTable, row: &'a RowFields) -> Self {
        let normalized = row
            .iter()
            .filter(|(_, cell)| cell.is_present())
            .map(|(header, cell)| (normalize_header(header), cell))
            .collect();
        Self { table, normalized }
    }

    /// First present alias of `field`, in table order.
    pub fn resolve(&self, field: CanonicalField) -> Option<&'a Cell> {
        self.table
            .aliases(field)
            .iter()
            .find_map(|alias| self.normalized.get(alias).copied())
    }

    /// Direct lookup of one header spelling, outside the alias table.
    pub fn resolve_header(&self, header: &str) -> Option<&'a Cell> {
        self.normalized.get(&normalize_header(header)).copied()
    }

    /// Resolved value rendered as text; empty when absent or falsy
    /// (so a numeric 0 in a text column reads as blank).
    pub fn text(&self, field: CanonicalField) -> String {
        self.resolve(field)
            .filter(|cell| cell.is_truthy())
            .map(Cell::to_string)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  ENDEREÇO "), "endereço");
        assert_eq!(normalize_header("área total MT²"), "área total mt²");
    }

    #[test]
    fn test_resolve_ignores_case_and_padding() {
        let table = AliasTable::default();
        let row: RowFields = vec![(" Endereço ", text("SQN 210")), ("aluguel", Cell::Number(2500.0))]
            .into_iter()
            .collect();
        let resolver = FieldResolver::new(&table, &row);
        assert_eq!(resolver.resolve(CanonicalField::Address), Some(&text("SQN 210")));
        assert_eq!(
            resolver.resolve(CanonicalField::Rent),
            Some(&Cell::Number(2500.0))
        );
        assert_eq!(resolver.resolve(CanonicalField::Condo), None);
    }

    #[test]
    fn test_area_alias_order() {
        let table = AliasTable::default();

        let all_three: RowFields = vec![
            ("MT²", Cell::Number(3.0)),
            ("Área total m²", Cell::Number(2.0)),
            ("Área Total MT²", Cell::Number(1.0)),
        ]
        .into_iter()
        .collect();
        let resolver = FieldResolver::new(&table, &all_three);
        assert_eq!(resolver.resolve(CanonicalField::Area), Some(&Cell::Number(1.0)));

        let m2_and_mt2: RowFields = vec![("mt²", Cell::Number(3.0)), ("área total m²", Cell::Number(2.0))]
            .into_iter()
            .collect();
        let resolver = FieldResolver::new(&table, &m2_and_mt2);
        assert_eq!(resolver.resolve(CanonicalField::Area), Some(&Cell::Number(2.0)));

        let only_mt2: RowFields = vec![("mt²", Cell::Number(3.0))].into_iter().collect();
        let resolver = FieldResolver::new(&table, &only_mt2);
        assert_eq!(resolver.resolve(CanonicalField::Area), Some(&Cell::Number(3.0)));
    }

    #[test]
    fn test_listing_url_aliases() {
        let table = AliasTable::default();
        let row: RowFields = vec![
            ("Anúncio", text("https://b.example")),
            ("Site", text("https://a.example")),
        ]
        .into_iter()
        .collect();
        let resolver = FieldResolver::new(&table, &row);
        assert_eq!(resolver.text(CanonicalField::ListingUrl), "https://a.example");
    }

    #[test]
    fn test_empty_cells_are_not_present() {
        let table = AliasTable::default();
        let row: RowFields = vec![("área total mt²", Cell::Empty), ("mt²", Cell::Number(40.0))]
            .into_iter()
            .collect();
        let resolver = FieldResolver::new(&table, &row);
        assert_eq!(resolver.resolve(CanonicalField::Area), Some(&Cell::Number(40.0)));
    }

    #[test]
    fn test_custom_alias_table() {
        let mut table = AliasTable::default();
        table.push(CanonicalField::Rent, "valor do aluguel");
        let row: RowFields = vec![("Valor do Aluguel", Cell::Number(1800.0))]
            .into_iter()
            .collect();
        let resolver = FieldResolver::new(&table, &row);
        assert_eq!(resolver.resolve(CanonicalField::Rent), Some(&Cell::Number(1800.0)));
    }

    #[test]
    fn test_later_duplicate_key_wins() {
        let table = AliasTable::default();
        let row: RowFields = vec![("IPTU", Cell::Number(10.0)), ("iptu ", Cell::Number(20.0))]
            .into_iter()
            .collect();
        let resolver = FieldResolver::new(&table, &row);
        assert_eq!(resolver.resolve(CanonicalField::Iptu), Some(&Cell::Number(20.0)));
    }
}
