use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{CourtScanError, CourtResult};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS venues (
    slug TEXT PRIMARY KEY,
    venue_name TEXT NOT NULL,
    organisation TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS slots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    organisation TEXT NOT NULL,
    venue_slug TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    starting_time TEXT NOT NULL,
    ending_time TEXT NOT NULL,
    spaces INTEGER NOT NULL,
    booking_url TEXT,
    last_refreshed TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_slots_organisation ON slots(organisation);
CREATE INDEX IF NOT EXISTS idx_slots_date_venue ON slots(date, venue_slug);

CREATE TABLE IF NOT EXISTS refresh_status (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    status TEXT NOT NULL,
    last_update TEXT NOT NULL
);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> CourtResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> CourtResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CourtScanError> {
        self.conn
            .lock()
            .map_err(|_| CourtScanError::Database(rusqlite::Error::InvalidQuery))
    }
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn time_to_sql(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Read a TEXT column written by [`date_to_sql`].
pub(crate) fn date_from_row(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a TEXT column written by [`time_to_sql`].
pub(crate) fn time_from_row(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    NaiveTime::parse_from_str(&raw, TIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
