use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{SlotChain, SlotRecord, VenueRecord};

pub const DEFAULT_CONSECUTIVE_COUNT: usize = 3;

/// Finds greedy runs of `consecutive_count` time-adjacent slots per venue and date.
///
/// A slot is adjacent to the next one when its end time is at or after the next
/// start time. After each chain only its first slot leaves the pool, so the tail
/// may be reused by the following chain.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveGroupFinder {
    consecutive_count: usize,
}

impl ConsecutiveGroupFinder {
    /// Panics if `consecutive_count` is below 2.
    pub fn new(consecutive_count: usize) -> Self {
        assert!(
            consecutive_count >= 2,
            "consecutive_count must be at least 2, got {}",
            consecutive_count
        );
        Self { consecutive_count }
    }

    pub fn find(&self, slots: &[SlotRecord], venues: &[VenueRecord]) -> Vec<SlotChain> {
        let mut pool = SlotPool::new(slots);
        let dates: BTreeSet<NaiveDate> = slots.iter().map(|s| s.date).collect();
        let mut chains = Vec::new();

        for date in &dates {
            for venue in venues {
                debug!(venue = %venue.slug, %date, "Extracting consecutive slots");

                while let Some(indices) = self.next_chain(&pool, &venue.slug, *date) {
                    let chain = SlotChain::new(indices.iter().map(|&i| pool.get(i).clone()).collect());
                    pool.remove(indices[0]);
                    chains.push(chain);
                }
            }
        }

        debug!(
            chains = chains.len(),
            remaining = pool.len(),
            "Consecutive slot extraction finished"
        );
        chains
    }

    /// One left-to-right scan over the live slots of a venue/date. Returns pool
    /// indices of the first completed chain.
    fn next_chain(&self, pool: &SlotPool<'_>, venue_slug: &str, date: NaiveDate) -> Option<Vec<usize>> {
        let mut candidates: Vec<usize> = pool
            .live_indices()
            .filter(|&i| {
                let slot = pool.get(i);
                slot.venue_slug == venue_slug && slot.date == date
            })
            .collect();
        // stable: equal start times keep pool order
        candidates.sort_by_key(|&i| pool.get(i).starting_time);

        let mut chain: Vec<usize> = Vec::new();
        for pair in candidates.windows(2) {
            let (current, next) = (pair[0], pair[1]);

            if pool.get(current).touches(pool.get(next)) {
                chain.push(current);

                if chain.len() == self.consecutive_count - 1 {
                    chain.push(next);
                    break;
                }
            } else {
                chain.clear();
            }
        }

        (chain.len() == self.consecutive_count).then_some(chain)
    }
}

impl Default for ConsecutiveGroupFinder {
    fn default() -> Self {
        Self::new(DEFAULT_CONSECUTIVE_COUNT)
    }
}

/// Removable view over the caller's slots. Entries are addressed by their
/// original position so removal never depends on value equality.
struct SlotPool<'a> {
    slots: &'a [SlotRecord],
    removed: Vec<bool>,
}

impl<'a> SlotPool<'a> {
    fn new(slots: &'a [SlotRecord]) -> Self {
        Self {
            slots,
            removed: vec![false; slots.len()],
        }
    }

    fn get(&self, index: usize) -> &'a SlotRecord {
        &self.slots[index]
    }

    fn remove(&mut self, index: usize) {
        self.removed[index] = true;
    }

    fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.removed
            .iter()
            .enumerate()
            .filter(|(_, removed)| !**removed)
            .map(|(i, _)| i)
    }

    fn len(&self) -> usize {
        self.removed.iter().filter(|removed| !**removed).count()
    }
}
