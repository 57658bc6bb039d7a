use chrono::NaiveDate;

use crate::domain::{SlotRecord, VenueRecord};
use crate::errors::CourtResult;

pub trait ProviderFeed: Send + Sync {
    /// Organisation identifier stored on every slot, e.g. "better.org.uk"
    fn organisation(&self) -> &'static str;

    /// How many days from today this provider is scraped for
    fn days_ahead(&self) -> i64;

    /// Venues this provider publishes availability for
    fn venues(&self) -> Vec<VenueRecord>;

    /// Fetch normalized slots for the given dates
    fn fetch_slots(&self, dates: &[NaiveDate]) -> CourtResult<Vec<SlotRecord>>;
}
