// MyRent - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// =============================================================================
// Property record
// =============================================================================

/// A single rental listing in the catalogue.
///
/// Produced by the import pipeline or the manual catalogue path and read
/// (never mutated) by analytics. `total_cost` is always derived from the
/// three cost components; no input path may set it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    /// Store-assigned identity. `None` until the record is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub title: String,

    /// Free-form address; the deduplication key.
    pub address: String,

    /// Administrative region. Empty when unknown.
    pub region: String,

    /// Total area in m². 0 when unknown.
    pub area: f64,

    pub rent_value: f64,
    pub condo_fee: f64,
    pub iptu: f64,

    /// `rent_value + condo_fee + iptu`, recomputed on every write path.
    pub total_cost: f64,

    pub status: Status,

    /// Short labels in insertion order, without duplicates.
    pub tags: Vec<String>,

    /// Newline-joined note sections.
    pub notes: String,

    /// Link to the original listing. Empty when unknown.
    pub listing_url: String,

    /// Coordinates supplied later by an external geocoder.
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl PropertyRecord {
    /// An empty record stamped with `created_at`; every other field blank.
    pub fn blank(created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title: String::new(),
            address: String::new(),
            region: String::new(),
            area: 0.0,
            rent_value: 0.0,
            condo_fee: 0.0,
            iptu: 0.0,
            total_cost: 0.0,
            status: Status::default(),
            tags: Vec::new(),
            notes: String::new(),
            listing_url: String::new(),
            lat: None,
            lng: None,
            created_at,
        }
    }

    /// Re-derive `total_cost` from the cost components.
    pub fn recompute_total(&mut self) {
        self.total_cost = self.rent_value + self.condo_fee + self.iptu;
    }

    /// Append `tag` unless it is empty or already present.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Where a listing stands in the user's search.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Status {
    #[default]
    #[serde(rename = "Interessado")]
    Interested,
    #[serde(rename = "Visitado")]
    Visited,
    #[serde(rename = "Descartado")]
    Discarded,
    #[serde(rename = "Alugado")]
    Rented,
}

impl Status {
    /// Returns all variants in workflow order.
    pub fn all() -> &'static [Status] {
        &[
            Status::Interested,
            Status::Visited,
            Status::Discarded,
            Status::Rented,
        ]
    }

    /// The stored/displayed label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Interested => "Interessado",
            Status::Visited => "Visitado",
            Status::Discarded => "Descartado",
            Status::Rented => "Alugado",
        }
    }

    /// Exact-label lookup. Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Status> {
        Status::all().iter().copied().find(|s| s.label() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Case-insensitive, for CLI input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Status::all()
            .iter()
            .copied()
            .find(|st| st.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                format!("unknown status '{s}' (expected Interessado, Visitado, Descartado or Alugado)")
            })
    }
}

// =============================================================================
// Cells
// =============================================================================

/// One raw cell from a tabular source, typed the way spreadsheets type them.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// A complete decimal literal, optionally signed, with optional exponent.
fn plain_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("static regex compiles")
    })
}

/// The leading decimal literal of a string, ignoring leading whitespace.
fn number_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)").expect("static regex compiles")
    })
}

impl Cell {
    /// Type a text cell from a CSV source: blank is `Empty`, a plain decimal
    /// literal is `Number`, anything else is kept verbatim as `Text`.
    pub fn from_text(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if plain_number_re().is_match(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Cell::Number(n);
                }
            }
        }
        Cell::Text(raw.to_string())
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Cell::Empty)
    }

    /// Non-empty text, non-zero number, or `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whole-value numeric cast. Blank text is 0; anything that is not a
    /// complete decimal literal collapses to 0, as does a non-finite number.
    /// This cannot tell an explicit 0 from unparsable input.
    pub fn to_number_lossy(&self) -> f64 {
        let n = match self {
            Cell::Empty => 0.0,
            Cell::Number(n) => *n,
            Cell::Bool(b) => f64::from(u8::from(*b)),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || !plain_number_re().is_match(trimmed) {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
        };
        if n.is_finite() {
            n
        } else {
            0.0
        }
    }

    /// Leading-prefix float parse (`"85 m²"` is 85). Unparsable is 0.
    pub fn to_float_prefix(&self) -> f64 {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => number_prefix_re()
                .captures(s)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0),
            Cell::Empty | Cell::Bool(_) => 0.0,
        };
        if n.is_finite() {
            n
        } else {
            0.0
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

// =============================================================================
// Import summary
// =============================================================================

/// Outcome of a completed import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records written by the final bulk insert.
    pub inserted: usize,

    /// Valid records dropped because their address was already known.
    pub skipped_duplicates: usize,
}

impl ImportSummary {
    /// User-facing message.
    pub fn message(&self) -> String {
        let mut message = format!("{} imóveis importados com sucesso!", self.inserted);
        if self.skipped_duplicates > 0 {
            message.push_str(&format!(
                " ({} ignorados por duplicidade)",
                self.skipped_duplicates
            ));
        }
        message
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
