use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One bookable interval at a venue on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub venue_slug: String,
    pub organisation: String,
    pub name: String,
    pub date: NaiveDate,
    pub starting_time: NaiveTime,
    pub ending_time: NaiveTime,
    pub spaces: u32,
    pub booking_url: Option<String>,
}

impl SlotRecord {
    pub fn new(
        venue_slug: String,
        organisation: String,
        date: NaiveDate,
        starting_time: NaiveTime,
        ending_time: NaiveTime,
    ) -> Self {
        Self {
            venue_slug,
            organisation,
            name: String::new(),
            date,
            starting_time,
            ending_time,
            spaces: 1,
            booking_url: None,
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    pub fn with_spaces(mut self, spaces: u32) -> Self {
        self.spaces = spaces;
        self
    }

    pub fn with_booking_url(mut self, booking_url: Option<String>) -> Self {
        self.booking_url = booking_url;
        self
    }

    /// True when this slot ends at or after `next` starts.
    pub fn touches(&self, next: &SlotRecord) -> bool {
        self.ending_time >= next.starting_time
    }
}
