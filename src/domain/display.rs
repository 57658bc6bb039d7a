use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Card/carousel entry for one consecutive slot grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub distance: String,
    pub venue: String,
    pub organisation: String,
    pub raw_date: NaiveDate,
    pub date: String,
    pub group_start_time: NaiveTime,
    pub group_end_time: NaiveTime,
    pub slots_starting_times: String,
    pub bookings_url: Option<String>,
}

impl DisplayRecord {
    /// Format: "{date} {HH:MM} {venue} ({organisation}): {slots_starting_times}"
    pub fn format(&self) -> String {
        let mut line = format!(
            "{} {} {} ({}): {}",
            self.date,
            self.group_start_time.format("%H:%M"),
            self.venue,
            self.organisation,
            self.slots_starting_times
        );

        if let Some(url) = &self.bookings_url {
            line.push(' ');
            line.push_str(url);
        }

        line
    }
}
