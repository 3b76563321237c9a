// MyRent - platform/sqlite.rs
//
// SQLite-backed `PropertyStore`.
//
// One `properties` table. Tags are a JSON array in a TEXT column and
// `created_at` goes through rusqlite's chrono support. A bulk insert runs
// inside one transaction: either every row lands or none do.

use crate::core::model::{PropertyRecord, Status};
use crate::core::store::PropertyStore;
use crate::util::error::StoreError;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS properties (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    address     TEXT NOT NULL,
    region      TEXT NOT NULL,
    area        REAL NOT NULL,
    rent_value  REAL NOT NULL,
    condo_fee   REAL NOT NULL,
    iptu        REAL NOT NULL,
    total_cost  REAL NOT NULL,
    status      TEXT NOT NULL,
    tags        TEXT NOT NULL,
    notes       TEXT NOT NULL,
    listing_url TEXT NOT NULL,
    lat         REAL,
    lng         REAL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_properties_address ON properties(address);
CREATE INDEX IF NOT EXISTS idx_properties_status ON properties(status);
"#;

const SELECT_COLUMNS: &str = "SELECT id, title, address, region, area, rent_value, condo_fee, \
     iptu, total_cost, status, tags, notes, listing_url, lat, lng, created_at FROM properties";

/// SQLite store over a single connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

fn sqlite_err(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| StoreError::Sqlite { operation, source }
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(sqlite_err("open"))?;
        tracing::debug!(path = %path.display(), "SQLite store opened");
        Self::with_connection(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(sqlite_err("open"))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(sqlite_err("apply schema"))?;
        Ok(Self { conn })
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<PropertyRecord>, StoreError> {
        let mut stmt = self.conn.prepare(sql).map_err(sqlite_err("prepare select"))?;
        let rows = stmt
            .query_map(params, record_from_row)
            .map_err(sqlite_err("select"))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(sqlite_err("read row"))?);
        }
        Ok(out)
    }
}

fn encode_tags(tags: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(tags).map_err(|source| StoreError::Serialize {
        field: "tags",
        source,
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PropertyRecord> {
    let tags_json: String = row.get(10)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;
    let status: String = row.get(9)?;

    Ok(PropertyRecord {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        address: row.get(2)?,
        region: row.get(3)?,
        area: row.get(4)?,
        rent_value: row.get(5)?,
        condo_fee: row.get(6)?,
        iptu: row.get(7)?,
        total_cost: row.get(8)?,
        status: Status::from_label(&status).unwrap_or_default(),
        tags,
        notes: row.get(11)?,
        listing_url: row.get(12)?,
        lat: row.get(13)?,
        lng: row.get(14)?,
        created_at: row.get(15)?,
    })
}

impl PropertyStore for SqliteStore {
    fn scan_all(&self) -> Result<Vec<PropertyRecord>, StoreError> {
        self.query_records(&format!("{SELECT_COLUMNS} ORDER BY id"), [])
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<PropertyRecord>, StoreError> {
        self.query_records(
            &format!("{SELECT_COLUMNS} WHERE status = ?1 ORDER BY id"),
            params![status.label()],
        )
    }

    fn addresses(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT address FROM properties ORDER BY address")
            .map_err(sqlite_err("prepare select"))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(sqlite_err("select addresses"))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(sqlite_err("read row"))?);
        }
        Ok(out)
    }

    fn bulk_insert(&mut self, records: Vec<PropertyRecord>) -> Result<Vec<i64>, StoreError> {
        let tx = self.conn.transaction().map_err(sqlite_err("begin"))?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO properties (title, address, region, area, rent_value, \
                     condo_fee, iptu, total_cost, status, tags, notes, listing_url, lat, lng, \
                     created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                )
                .map_err(sqlite_err("prepare insert"))?;

            for record in &records {
                stmt.execute(params![
                    record.title,
                    record.address,
                    record.region,
                    record.area,
                    record.rent_value,
                    record.condo_fee,
                    record.iptu,
                    record.total_cost,
                    record.status.label(),
                    encode_tags(&record.tags)?,
                    record.notes,
                    record.listing_url,
                    record.lat,
                    record.lng,
                    record.created_at,
                ])
                .map_err(sqlite_err("insert"))?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit().map_err(sqlite_err("commit"))?;

        tracing::debug!(inserted = ids.len(), "Bulk insert committed");
        Ok(ids)
    }

    fn update(&mut self, record: &PropertyRecord) -> Result<(), StoreError> {
        let id = record.id.ok_or(StoreError::MissingId)?;
        let changed = self
            .conn
            .execute(
                "UPDATE properties SET title = ?1, address = ?2, region = ?3, area = ?4, \
                 rent_value = ?5, condo_fee = ?6, iptu = ?7, total_cost = ?8, status = ?9, \
                 tags = ?10, notes = ?11, listing_url = ?12, lat = ?13, lng = ?14, \
                 created_at = ?15 WHERE id = ?16",
                params![
                    record.title,
                    record.address,
                    record.region,
                    record.area,
                    record.rent_value,
                    record.condo_fee,
                    record.iptu,
                    record.total_cost,
                    record.status.label(),
                    encode_tags(&record.tags)?,
                    record.notes,
                    record.listing_url,
                    record.lat,
                    record.lng,
                    record.created_at,
                    id,
                ],
            )
            .map_err(sqlite_err("update"))?;

        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM properties WHERE id = ?1", params![id])
            .map_err(sqlite_err("delete"))?;
        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}
