use std::collections::HashMap;

use tracing::debug;

use crate::domain::{DisplayRecord, SlotChain, VenueRecord};

/// Placeholder until venues carry coordinates.
pub const DISTANCE_PLACEHOLDER: &str = "Approx x. miles away";

pub const SLOTS_STARTING_LABEL: &str = "Slots starting at ";

/// Source of venue records used to turn slugs into display names.
pub trait VenueLookup {
    fn venues(&self) -> Vec<VenueRecord>;
}

impl VenueLookup for Vec<VenueRecord> {
    fn venues(&self) -> Vec<VenueRecord> {
        self.clone()
    }
}

impl VenueLookup for HashMap<String, VenueRecord> {
    fn venues(&self) -> Vec<VenueRecord> {
        self.values().cloned().collect()
    }
}

pub struct GroupingFormatter<'a> {
    venue_lookup: &'a dyn VenueLookup,
}

impl<'a> GroupingFormatter<'a> {
    pub fn new(venue_lookup: &'a dyn VenueLookup) -> Self {
        Self { venue_lookup }
    }

    /// Build display records for the chains and sort them by distance, date
    /// and start time. Chains whose venue slug is unknown are dropped.
    pub fn format(&self, chains: &[SlotChain]) -> Vec<DisplayRecord> {
        let venue_slug_map: HashMap<String, VenueRecord> = self
            .venue_lookup
            .venues()
            .into_iter()
            .map(|venue| (venue.slug.clone(), venue))
            .collect();

        let mut records: Vec<DisplayRecord> = chains
            .iter()
            .filter_map(|chain| Self::display_record(chain, &venue_slug_map))
            .collect();

        let omitted = chains.len() - records.len();
        if omitted > 0 {
            debug!(omitted, "Dropped groupings with unknown venue slug");
        }

        records.sort_by(|a, b| {
            (&a.distance, a.raw_date, a.group_start_time).cmp(&(
                &b.distance,
                b.raw_date,
                b.group_start_time,
            ))
        });

        records
    }

    fn display_record(
        chain: &SlotChain,
        venue_slug_map: &HashMap<String, VenueRecord>,
    ) -> Option<DisplayRecord> {
        let initial_slot = chain.first();
        let venue = venue_slug_map.get(&initial_slot.venue_slug)?;

        let starting_times: Vec<String> = chain
            .starting_times()
            .map(|t| t.format("%H:%M").to_string())
            .collect();

        Some(DisplayRecord {
            distance: DISTANCE_PLACEHOLDER.to_string(),
            venue: venue.venue_name.clone(),
            organisation: initial_slot.organisation.clone(),
            raw_date: initial_slot.date,
            date: initial_slot.date.format("%Y-%m-%d (%A)").to_string(),
            group_start_time: initial_slot.starting_time,
            // Mirrors the start time; the chain's true end is not surfaced.
            group_end_time: initial_slot.starting_time,
            slots_starting_times: format!("{}{}", SLOTS_STARTING_LABEL, starting_times.join(", ")),
            bookings_url: initial_slot.booking_url.clone(),
        })
    }
}
