use crate::domain::VenueRecord;
use crate::errors::{CourtScanError, CourtResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::VenueRepository;

pub struct SqliteVenueRepository {
    storage: SqliteStorage,
}

impl SqliteVenueRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn row_to_venue(row: &rusqlite::Row<'_>) -> rusqlite::Result<VenueRecord> {
        Ok(VenueRecord {
            slug: row.get(0)?,
            venue_name: row.get(1)?,
            organisation: row.get(2)?,
        })
    }
}

impl VenueRepository for SqliteVenueRepository {
    fn upsert(&self, venue: &VenueRecord) -> CourtResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO venues (slug, venue_name, organisation) VALUES (?1, ?2, ?3)
             ON CONFLICT(slug) DO UPDATE SET venue_name = excluded.venue_name, organisation = excluded.organisation",
            (&venue.slug, &venue.venue_name, &venue.organisation),
        )?;
        Ok(())
    }

    fn get_all(&self) -> CourtResult<Vec<VenueRecord>> {
        let conn = self.storage.connection()?;
        let mut stmt =
            conn.prepare("SELECT slug, venue_name, organisation FROM venues ORDER BY venue_name")?;

        let venues = stmt.query_map([], Self::row_to_venue)?;

        venues.collect::<Result<Vec<_>, _>>().map_err(CourtScanError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> SqliteVenueRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteVenueRepository::new(storage)
    }

    fn venue(slug: &str, name: &str) -> VenueRecord {
        VenueRecord::new(slug.to_string(), name.to_string(), "better.org.uk".to_string())
    }

    #[test]
    fn test_upsert_and_get() {
        let repo = setup_repo();
        repo.upsert(&venue("sobell-leisure-centre", "Sobell Leisure Centre"))
            .unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all, vec![venue("sobell-leisure-centre", "Sobell Leisure Centre")]);
    }

    #[test]
    fn test_upsert_updates_name() {
        let repo = setup_repo();
        repo.upsert(&venue("sobell-leisure-centre", "Sobell")).unwrap();
        repo.upsert(&venue("sobell-leisure-centre", "Sobell Leisure Centre"))
            .unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].venue_name, "Sobell Leisure Centre");
    }

    #[test]
    fn test_get_all_sorted_by_name() {
        let repo = setup_repo();
        repo.upsert(&venue("sobell-leisure-centre", "Sobell Leisure Centre"))
            .unwrap();
        repo.upsert(&venue("islington-tennis-centre", "Islington Tennis Centre"))
            .unwrap();

        let names: Vec<String> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|v| v.venue_name)
            .collect();
        assert_eq!(names, vec!["Islington Tennis Centre", "Sobell Leisure Centre"]);
    }

    #[test]
    fn test_empty_store() {
        let repo = setup_repo();
        assert!(repo.get_all().unwrap().is_empty());
    }
}
