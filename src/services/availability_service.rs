use std::time::Instant;

use tracing::{debug, info};

use crate::domain::DisplayRecord;
use crate::errors::CourtResult;
use crate::grouping::{ConsecutiveGroupFinder, GroupingFormatter};
use crate::storage::traits::{SlotQuery, SlotRepository, VenueRepository};

pub struct AvailabilityService<S: SlotRepository, V: VenueRepository> {
    slot_repository: S,
    venue_repository: V,
}

impl<S: SlotRepository, V: VenueRepository> AvailabilityService<S, V> {
    pub fn new(slot_repository: S, venue_repository: V) -> Self {
        Self {
            slot_repository,
            venue_repository,
        }
    }

    /// Load bookable slots for `query`, find runs of `consecutive_count`
    /// back-to-back slots and return them as sorted display records.
    ///
    /// Panics if `consecutive_count` is below 2.
    pub fn consecutive_groupings(
        &self,
        query: &SlotQuery,
        consecutive_count: usize,
    ) -> CourtResult<Vec<DisplayRecord>> {
        let finder = ConsecutiveGroupFinder::new(consecutive_count);

        let slots = self.slot_repository.query(query)?;
        let venues = self.venue_repository.get_all()?;
        debug!(slots = slots.len(), venues = venues.len(), "Loaded availability");

        let started = Instant::now();
        let chains = finder.find(&slots, &venues);
        info!(
            chains = chains.len(),
            consecutive_count,
            elapsed = %format!("{:.4}s", started.elapsed().as_secs_f64()),
            "Found consecutive slots"
        );

        let started = Instant::now();
        let records = GroupingFormatter::new(&venues).format(&chains);
        info!(
            groupings = records.len(),
            elapsed = %format!("{:.4}s", started.elapsed().as_secs_f64()),
            "Formatted consecutive slot groupings"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SlotRecord, VenueRecord};
    use crate::grouping::DISTANCE_PLACEHOLDER;
    use crate::storage::sqlite::{SqliteSlotRepository, SqliteStorage, SqliteVenueRepository};
    use chrono::{NaiveDate, NaiveTime};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn time(hhmm: &str) -> NaiveTime {
        NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap()
    }

    fn slot(venue: &str, day: u32, start: &str, end: &str, spaces: u32) -> SlotRecord {
        SlotRecord::new(
            venue.to_string(),
            "better.org.uk".to_string(),
            date(day),
            time(start),
            time(end),
        )
        .with_spaces(spaces)
    }

    fn setup(slots: &[SlotRecord]) -> AvailabilityService<SqliteSlotRepository, SqliteVenueRepository> {
        let storage = SqliteStorage::in_memory().unwrap();
        let slot_repo = SqliteSlotRepository::new(storage.clone());
        let venue_repo = SqliteVenueRepository::new(storage);

        for (slug, name) in [
            ("sobell-leisure-centre", "Sobell Leisure Centre"),
            ("islington-tennis-centre", "Islington Tennis Centre"),
        ] {
            venue_repo
                .upsert(&VenueRecord::new(
                    slug.to_string(),
                    name.to_string(),
                    "better.org.uk".to_string(),
                ))
                .unwrap();
        }
        slot_repo
            .replace_for_organisation("better.org.uk", slots)
            .unwrap();

        AvailabilityService::new(slot_repo, venue_repo)
    }

    #[test]
    fn test_groupings_from_store() {
        let service = setup(&[
            slot("sobell-leisure-centre", 3, "18:00", "19:00", 2),
            slot("sobell-leisure-centre", 3, "19:00", "20:00", 1),
            slot("sobell-leisure-centre", 3, "20:00", "21:00", 3),
            slot("islington-tennis-centre", 3, "18:00", "19:00", 1),
            slot("islington-tennis-centre", 3, "19:30", "20:30", 1),
        ]);

        let records = service
            .consecutive_groupings(&SlotQuery::evenings_from(date(3)), 3)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].venue, "Sobell Leisure Centre");
        assert_eq!(records[0].distance, DISTANCE_PLACEHOLDER);
        assert_eq!(records[0].slots_starting_times, "Slots starting at 18:00, 19:00, 20:00");
    }

    #[test]
    fn test_full_slots_break_chains() {
        let service = setup(&[
            slot("sobell-leisure-centre", 3, "18:00", "19:00", 2),
            slot("sobell-leisure-centre", 3, "19:00", "20:00", 0),
            slot("sobell-leisure-centre", 3, "20:00", "21:00", 3),
        ]);

        let records = service
            .consecutive_groupings(&SlotQuery::evenings_from(date(3)), 2)
            .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_unknown_venue_slots_are_not_shown() {
        let service = setup(&[
            slot("closed-venue", 3, "18:00", "19:00", 2),
            slot("closed-venue", 3, "19:00", "20:00", 2),
        ]);

        let records = service
            .consecutive_groupings(&SlotQuery::evenings_from(date(3)), 2)
            .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_groupings_sorted_across_dates() {
        let service = setup(&[
            slot("islington-tennis-centre", 5, "18:00", "19:00", 1),
            slot("islington-tennis-centre", 5, "19:00", "20:00", 1),
            slot("sobell-leisure-centre", 4, "19:00", "20:00", 1),
            slot("sobell-leisure-centre", 4, "20:00", "21:00", 1),
            slot("sobell-leisure-centre", 3, "20:00", "21:00", 1),
            slot("sobell-leisure-centre", 3, "21:00", "22:00", 1),
        ]);

        let records = service
            .consecutive_groupings(&SlotQuery::evenings_from(date(3)), 2)
            .unwrap();

        let keys: Vec<(NaiveDate, NaiveTime)> =
            records.iter().map(|r| (r.raw_date, r.group_start_time)).collect();
        assert_eq!(
            keys,
            vec![
                (date(3), time("20:00")),
                (date(4), time("19:00")),
                (date(5), time("18:00")),
            ]
        );
    }

    #[test]
    fn test_empty_store() {
        let service = setup(&[]);

        let records = service
            .consecutive_groupings(&SlotQuery::evenings_from(date(3)), 3)
            .unwrap();

        assert!(records.is_empty());
    }
}
