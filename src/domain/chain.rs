use chrono::{NaiveDate, NaiveTime};

use super::SlotRecord;

/// A run of time-adjacent slots at one venue on one date, ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChain {
    slots: Vec<SlotRecord>,
}

impl SlotChain {
    /// Callers must pass at least one slot, already sorted by `starting_time`.
    pub(crate) fn new(slots: Vec<SlotRecord>) -> Self {
        debug_assert!(!slots.is_empty());
        Self { slots }
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first(&self) -> &SlotRecord {
        &self.slots[0]
    }

    pub fn venue_slug(&self) -> &str {
        &self.first().venue_slug
    }

    pub fn date(&self) -> NaiveDate {
        self.first().date
    }

    pub fn starting_times(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        self.slots.iter().map(|s| s.starting_time)
    }
}
