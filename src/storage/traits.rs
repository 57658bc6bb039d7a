use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::{PipelineRefreshStatus, RefreshStatusRecord, SlotRecord, VenueRecord};
use crate::errors::CourtResult;

/// Bounds for loading bookable slots. Only slots with free spaces are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub starting_time: NaiveTime,
    pub ending_time: NaiveTime,
    pub starting_date: NaiveDate,
    pub ending_date: NaiveDate,
}

impl SlotQuery {
    pub const DEFAULT_DAYS_AHEAD: i64 = 3;

    /// Evening slots (18:00 to 22:00) from `today` through the next three days
    pub fn evenings_from(today: NaiveDate) -> Self {
        Self {
            starting_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ending_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            starting_date: today,
            ending_date: today + Duration::days(Self::DEFAULT_DAYS_AHEAD),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait SlotRepository: Send + Sync {
    /// Delete every slot of the organisation and insert `slots` in its place.
    fn replace_for_organisation(&self, organisation: &str, slots: &[SlotRecord]) -> CourtResult<usize>;
    fn query(&self, query: &SlotQuery) -> CourtResult<Vec<SlotRecord>>;
    fn count(&self) -> CourtResult<usize>;
}

#[cfg_attr(test, mockall::automock)]
pub trait VenueRepository: Send + Sync {
    fn upsert(&self, venue: &VenueRecord) -> CourtResult<()>;
    fn get_all(&self) -> CourtResult<Vec<VenueRecord>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RefreshStatusRepository: Send + Sync {
    fn get(&self) -> CourtResult<Option<RefreshStatusRecord>>;
    fn set(&self, status: PipelineRefreshStatus, at: DateTime<Utc>) -> CourtResult<()>;
}
