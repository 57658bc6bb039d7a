use crate::domain::SlotRecord;
use crate::errors::{CourtScanError, CourtResult};
use crate::storage::sqlite::connection::{date_from_row, date_to_sql, time_from_row, time_to_sql};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{SlotQuery, SlotRepository};

pub struct SqliteSlotRepository {
    storage: SqliteStorage,
}

impl SqliteSlotRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn replace_for_organisation(&self, organisation: &str, slots: &[SlotRecord]) -> CourtResult<usize> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM slots WHERE organisation = ?1", [organisation])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO slots (organisation, venue_slug, name, date, starting_time, ending_time, spaces, booking_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for slot in slots {
                stmt.execute((
                    organisation,
                    &slot.venue_slug,
                    &slot.name,
                    date_to_sql(slot.date),
                    time_to_sql(slot.starting_time),
                    time_to_sql(slot.ending_time),
                    slot.spaces,
                    &slot.booking_url,
                ))?;
            }
        }

        tx.commit()?;
        Ok(slots.len())
    }

    fn query(&self, query: &SlotQuery) -> CourtResult<Vec<SlotRecord>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT venue_slug, organisation, name, date, starting_time, ending_time, spaces, booking_url
             FROM slots
             WHERE spaces > 0
               AND starting_time >= ?1
               AND ending_time <= ?2
               AND date >= ?3
               AND date <= ?4
             ORDER BY date, venue_slug, starting_time, id",
        )?;

        let slots = stmt.query_map(
            (
                time_to_sql(query.starting_time),
                time_to_sql(query.ending_time),
                date_to_sql(query.starting_date),
                date_to_sql(query.ending_date),
            ),
            |row| {
                Ok(SlotRecord {
                    venue_slug: row.get(0)?,
                    organisation: row.get(1)?,
                    name: row.get(2)?,
                    date: date_from_row(row, 3)?,
                    starting_time: time_from_row(row, 4)?,
                    ending_time: time_from_row(row, 5)?,
                    spaces: row.get(6)?,
                    booking_url: row.get(7)?,
                })
            },
        )?;

        slots.collect::<Result<Vec<_>, _>>().map_err(CourtScanError::from)
    }

    fn count(&self) -> CourtResult<usize> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
