use std::time::Instant;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::PipelineRefreshStatus;
use crate::errors::CourtResult;
use crate::providers::{ProviderFeed, ProviderRegistry};
use crate::storage::traits::{RefreshStatusRepository, SlotRepository, VenueRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshDecision {
    Refresh,
    /// Another run started within the interval
    AlreadyRunning { since: DateTime<Utc> },
    /// Last completed run is newer than the interval
    UpToDate { last_update: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRefresh {
    pub organisation: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub venues: usize,
    pub slots: usize,
}

pub struct RefreshService<S: SlotRepository, V: VenueRepository, R: RefreshStatusRepository> {
    slot_repository: S,
    venue_repository: V,
    status_repository: R,
    registry: ProviderRegistry,
    refresh_interval: Duration,
}

impl<S: SlotRepository, V: VenueRepository, R: RefreshStatusRepository> RefreshService<S, V, R> {
    pub fn new(
        slot_repository: S,
        venue_repository: V,
        status_repository: R,
        registry: ProviderRegistry,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            slot_repository,
            venue_repository,
            status_repository,
            registry,
            refresh_interval,
        }
    }

    /// Decide whether a refresh is due at `now`. A run marked as running for
    /// longer than the interval is treated as abandoned.
    pub fn decide(&self, now: DateTime<Utc>) -> CourtResult<RefreshDecision> {
        let Some(record) = self.status_repository.get()? else {
            return Ok(RefreshDecision::Refresh);
        };

        let fresh = now - record.last_update < self.refresh_interval;

        Ok(match record.status {
            PipelineRefreshStatus::Running if fresh => RefreshDecision::AlreadyRunning {
                since: record.last_update,
            },
            PipelineRefreshStatus::Completed if fresh => RefreshDecision::UpToDate {
                last_update: record.last_update,
            },
            _ => RefreshDecision::Refresh,
        })
    }

    /// Scrape providers from `today` over their windows and replace the
    /// stored slots of each organisation. With `organisation` set, only that
    /// provider is refreshed.
    pub fn refresh(&self, today: NaiveDate, organisation: Option<&str>) -> CourtResult<Vec<ProviderRefresh>> {
        let providers: Vec<&dyn ProviderFeed> = match organisation {
            Some(organisation) => vec![self.registry.find(organisation)?],
            None => self.registry.providers().collect(),
        };

        let started = Instant::now();
        self.status_repository
            .set(PipelineRefreshStatus::Running, Utc::now())?;

        let mut summary = Vec::new();
        for provider in providers {
            match self.refresh_provider(provider, today) {
                Ok(result) => summary.push(result),
                Err(e) => {
                    warn!(organisation = provider.organisation(), error = %e, "Refresh failed");
                    self.status_repository
                        .set(PipelineRefreshStatus::Failed, Utc::now())?;
                    return Err(e);
                }
            }
        }

        self.status_repository
            .set(PipelineRefreshStatus::Completed, Utc::now())?;
        info!(
            providers = summary.len(),
            elapsed = %format!("{:.4}s", started.elapsed().as_secs_f64()),
            "Refresh completed"
        );

        Ok(summary)
    }

    fn refresh_provider(&self, provider: &dyn ProviderFeed, today: NaiveDate) -> CourtResult<ProviderRefresh> {
        let organisation = provider.organisation();
        let dates = date_window(today, provider.days_ahead());
        let (first_date, last_date) = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (today, today),
        };
        info!(organisation, %first_date, %last_date, "Fetching slots");

        let venues = provider.venues();
        for venue in &venues {
            self.venue_repository.upsert(venue)?;
        }

        let slots = provider.fetch_slots(&dates)?;
        info!(organisation, slots = slots.len(), "Delete/insert slots");
        let stored = self
            .slot_repository
            .replace_for_organisation(organisation, &slots)?;

        Ok(ProviderRefresh {
            organisation: organisation.to_string(),
            first_date,
            last_date,
            venues: venues.len(),
            slots: stored,
        })
    }
}

/// `days` consecutive dates starting at `today`
pub fn date_window(today: NaiveDate, days: i64) -> Vec<NaiveDate> {
    (0..days).map(|i| today + Duration::days(i)).collect()
}
