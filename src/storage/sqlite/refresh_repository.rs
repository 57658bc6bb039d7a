use chrono::{DateTime, Utc};
use rusqlite::types::Type;

use crate::domain::{PipelineRefreshStatus, RefreshStatusRecord};
use crate::errors::{CourtScanError, CourtResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::RefreshStatusRepository;

/// Single-row table holding the status of the last refresh run.
pub struct SqliteRefreshStatusRepository {
    storage: SqliteStorage,
}

impl SqliteRefreshStatusRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl RefreshStatusRepository for SqliteRefreshStatusRepository {
    fn get(&self) -> CourtResult<Option<RefreshStatusRecord>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT status, last_update FROM refresh_status WHERE id = 1")?;

        let record = stmt.query_row([], |row| {
            let status_str: String = row.get(0)?;
            let last_update_str: String = row.get(1)?;

            let status = status_str.parse::<PipelineRefreshStatus>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into())
            })?;
            let last_update = DateTime::parse_from_rfc3339(&last_update_str)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);

            Ok(RefreshStatusRecord {
                status,
                last_update,
            })
        });

        match record {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CourtScanError::from(e)),
        }
    }

    fn set(&self, status: PipelineRefreshStatus, at: DateTime<Utc>) -> CourtResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO refresh_status (id, status, last_update) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET status = excluded.status, last_update = excluded.last_update",
            (status.as_str(), at.to_rfc3339()),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup_repo() -> SqliteRefreshStatusRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteRefreshStatusRepository::new(storage)
    }

    #[test]
    fn test_empty_status() {
        let repo = setup_repo();
        assert!(repo.get().unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites_single_row() {
        let repo = setup_repo();
        let started = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 6, 3, 8, 5, 0).unwrap();

        repo.set(PipelineRefreshStatus::Running, started).unwrap();
        repo.set(PipelineRefreshStatus::Completed, finished).unwrap();

        let record = repo.get().unwrap().unwrap();
        assert_eq!(record.status, PipelineRefreshStatus::Completed);
        assert_eq!(record.last_update, finished);
    }
}
