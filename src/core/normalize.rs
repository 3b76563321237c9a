// MyRent - core/normalize.rs
//
// Builds `PropertyRecord` candidates from resolved spreadsheet rows and
// from backup objects. Pure functions: the caller supplies the clock.

use crate::core::fields::{CanonicalField, FieldResolver};
use crate::core::model::{Cell, PropertyRecord, Status};
use crate::util::constants::{BALCONY_TAG, BALCONY_YES, PLACEHOLDER_TITLE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

// =============================================================================
// Tabular rows
// =============================================================================

/// Normalise one spreadsheet row into a fresh `Interessado` candidate.
pub fn normalize_row(fields: &FieldResolver<'_>, now: DateTime<Utc>) -> PropertyRecord {
    use CanonicalField as F;

    let region = fields.text(F::Region);
    let address = fields.text(F::Address);
    let kind = fields.text(F::Kind);
    let residential = fields.text(F::Residential);
    let leisure = fields.text(F::Leisure);
    let contact = fields.text(F::Contact);

    let area_cell = fields
        .resolve(F::Area)
        .filter(|c| c.is_truthy())
        .or_else(|| fields.resolve_header("área"));

    let mut record = PropertyRecord::blank(now);
    record.title = compose_title(&kind, &residential, &region, &address);
    record.rent_value = number_of(fields.resolve(F::Rent));
    record.condo_fee = number_of(fields.resolve(F::Condo));
    record.iptu = number_of(fields.resolve(F::Iptu));
    record.area = area_cell.map(Cell::to_float_prefix).unwrap_or(0.0);
    record.listing_url = fields.text(F::ListingUrl);
    record.status = Status::Interested;

    record.push_tag(kind.clone());
    if let Some(n) = fields.resolve(F::Bedrooms).filter(|c| c.is_truthy()) {
        record.push_tag(format!("{n} quartos"));
    }
    if let Some(n) = fields.resolve(F::Bathrooms).filter(|c| c.is_truthy()) {
        record.push_tag(format!("{n} banheiros"));
    }
    if fields.resolve(F::Balcony).and_then(Cell::as_text) == Some(BALCONY_YES) {
        record.push_tag(BALCONY_TAG);
    }
    record.push_tag(fields.text(F::Accessibility));
    record.push_tag(fields.text(F::Metro));

    let area_note = fields
        .resolve(F::Area)
        .filter(|c| c.is_truthy())
        .map(|c| format!("{c}m²"))
        .unwrap_or_default();
    record.notes = join_notes(&[
        ("Residencial", &residential),
        ("Área", &area_note),
        ("Lazer", &leisure),
        ("Contato", &contact),
        ("Região", &region),
    ]);

    record.region = region;
    record.address = address;
    record.recompute_total();
    record
}

/// `"{kind} ({residential}) em {region or address}"`, trimmed.
///
/// The placeholder only replaces a title that trims to nothing; a row with
/// no kind, complex, region or address still reads `"em"`.
fn compose_title(kind: &str, residential: &str, region: &str, address: &str) -> String {
    let place = if region.is_empty() { address } else { region };
    let suffix = if residential.is_empty() {
        String::new()
    } else {
        format!(" ({residential})")
    };

    let title = format!("{kind}{suffix} em {place}").trim().to_string();
    if title.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        title
    }
}

fn number_of(cell: Option<&Cell>) -> f64 {
    cell.map(Cell::to_number_lossy).unwrap_or(0.0)
}

fn join_notes(sections: &[(&str, &str)]) -> String {
    sections
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Backup objects
// =============================================================================

/// Rebuild a record from one element of a backup array.
///
/// Backup objects already use the record's own field names. Any `id` is
/// ignored, `status` falls back to `Interessado` when missing or unknown,
/// `created_at` is kept when parseable, and `total_cost` is recomputed.
pub fn normalize_backup(value: &Value, now: DateTime<Utc>) -> PropertyRecord {
    let get = |key: &str| value.as_object().and_then(|obj| obj.get(key));

    let mut record = PropertyRecord::blank(now);
    record.title = json_text(get("title"));
    record.address = json_text(get("address"));
    record.region = json_text(get("region"));
    record.notes = json_text(get("notes"));
    record.listing_url = json_text(get("listing_url"));
    record.area = json_number(get("area"));
    record.rent_value = json_number(get("rent_value"));
    record.condo_fee = json_number(get("condo_fee"));
    record.iptu = json_number(get("iptu"));
    record.status = get("status")
        .and_then(Value::as_str)
        .and_then(Status::from_label)
        .unwrap_or_default();
    record.lat = get("lat").and_then(Value::as_f64).filter(|v| v.is_finite());
    record.lng = get("lng").and_then(Value::as_f64).filter(|v| v.is_finite());

    if let Some(tags) = get("tags").and_then(Value::as_array) {
        for tag in tags {
            record.push_tag(json_text(Some(tag)));
        }
    }

    if let Some(ts) = get("created_at").and_then(parse_backup_timestamp) {
        record.created_at = ts;
    }

    record.recompute_total();
    record
}

fn json_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Same lossy cast as spreadsheet cells: numeric strings count, anything
/// else is 0.
fn json_number(value: Option<&Value>) -> f64 {
    let cell = match value {
        Some(Value::Number(n)) => Cell::Number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => Cell::Text(s.clone()),
        Some(Value::Bool(b)) => Cell::Bool(*b),
        _ => Cell::Empty,
    };
    cell.to_number_lossy()
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), a
/// plain date, or epoch milliseconds.
pub fn parse_backup_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, format) {
                    return Some(ndt.and_utc());
                }
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
