use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::domain::{SlotRecord, VenueRecord};
use crate::errors::{CourtScanError, CourtResult};
use crate::providers::traits::ProviderFeed;

pub const ORGANISATION: &str = "better.org.uk";

const DAYS_AHEAD: i64 = 6;

/// (slug, display name) of the Better venues we scrape
const VENUES: &[(&str, &str)] = &[
    ("britannia-leisure-centre", "Britannia Leisure Centre"),
    ("islington-tennis-centre", "Islington Tennis Centre"),
    ("queensbridge-sports-community-centre", "Queensbridge Sports & Community Centre"),
    ("sobell-leisure-centre", "Sobell Leisure Centre"),
    ("york-hall-leisure-centre", "York Hall Leisure Centre"),
];

#[derive(Debug, Deserialize)]
struct TimesResponse {
    data: TimesData,
}

/// The API returns either a list or an index-keyed object of entries.
/// Keys are numeric positions, so they are ordered as integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimesData {
    List(Vec<TimeEntry>),
    Keyed(BTreeMap<String, TimeEntry>),
}

impl TimesData {
    fn into_entries(self) -> Vec<TimeEntry> {
        match self {
            TimesData::List(entries) => entries,
            TimesData::Keyed(entries) => {
                let mut keyed: Vec<(String, TimeEntry)> = entries.into_iter().collect();
                keyed.sort_by_key(|(key, _)| key.parse::<u32>().unwrap_or(u32::MAX));
                keyed.into_iter().map(|(_, entry)| entry).collect()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeEntry {
    starts_at: ClockTime,
    ends_at: ClockTime,
    date: NaiveDate,
    venue_slug: String,
    spaces: u32,
    name: String,
    category_slug: String,
}

#[derive(Debug, Deserialize)]
struct ClockTime {
    format_24_hour: String,
}

pub struct BetterProvider {
    client: Client,
    api_url: String,
    bookings_url: String,
    activity: String,
}

impl BetterProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url: config.better_api_url.trim_end_matches('/').to_string(),
            bookings_url: config.better_bookings_url.trim_end_matches('/').to_string(),
            activity: config.better_activity.clone(),
        }
    }

    fn times_url(&self, venue_slug: &str, date: NaiveDate) -> CourtResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/api/activities/venue/{}/activity/{}/times",
            self.api_url, venue_slug, self.activity
        ))
        .map_err(|e| CourtScanError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn fetch_day(&self, venue_slug: &str, date: NaiveDate) -> CourtResult<Vec<SlotRecord>> {
        let url = self.times_url(venue_slug, date)?;
        debug!(%url, "Requesting Better times");

        let response = self
            .client
            .get(url)
            .header("Origin", &self.bookings_url)
            .header("Referer", format!("{}/", self.bookings_url))
            .send()?
            .error_for_status()?;
        let bytes = response.bytes()?;

        Self::slots_from_bytes(&bytes, &self.bookings_url)
    }

    /// Parse a times response body into slot records
    fn slots_from_bytes(bytes: &[u8], bookings_url: &str) -> CourtResult<Vec<SlotRecord>> {
        let response: TimesResponse = serde_json::from_slice(bytes)
            .map_err(|e| CourtScanError::ProviderParse(format!("better.org.uk times: {}", e)))?;

        response
            .data
            .into_entries()
            .into_iter()
            .map(|entry| -> CourtResult<SlotRecord> {
                let start = parse_clock(&entry.starts_at.format_24_hour)?;
                let end = parse_clock(&entry.ends_at.format_24_hour)?;
                let booking_url = format!(
                    "{}/location/{}/{}/{}/by-time/slot/{}-{}",
                    bookings_url,
                    entry.venue_slug,
                    entry.category_slug,
                    entry.date.format("%Y-%m-%d"),
                    entry.starts_at.format_24_hour,
                    entry.ends_at.format_24_hour
                );

                Ok(SlotRecord::new(
                    entry.venue_slug,
                    ORGANISATION.to_string(),
                    entry.date,
                    start,
                    end,
                )
                .with_name(entry.name)
                .with_spaces(entry.spaces)
                .with_booking_url(Some(booking_url)))
            })
            .collect()
    }
}

fn parse_clock(raw: &str) -> CourtResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| CourtScanError::ProviderParse(format!("invalid time '{}': {}", raw, e)))
}

impl ProviderFeed for BetterProvider {
    fn organisation(&self) -> &'static str {
        ORGANISATION
    }

    fn days_ahead(&self) -> i64 {
        DAYS_AHEAD
    }

    fn venues(&self) -> Vec<VenueRecord> {
        VENUES
            .iter()
            .map(|(slug, name)| {
                VenueRecord::new(slug.to_string(), name.to_string(), ORGANISATION.to_string())
            })
            .collect()
    }

    fn fetch_slots(&self, dates: &[NaiveDate]) -> CourtResult<Vec<SlotRecord>> {
        let mut slots = Vec::new();

        for (venue_slug, _) in VENUES {
            for date in dates {
                match self.fetch_day(venue_slug, *date) {
                    Ok(day_slots) => slots.extend(day_slots),
                    Err(e) => warn!(venue = venue_slug, %date, error = %e, "Skipping Better venue/date"),
                }
            }
        }

        info!(organisation = ORGANISATION, slots = slots.len(), "Fetched slots");
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKINGS: &str = "https://bookings.better.org.uk";

    const SAMPLE_LIST: &[u8] = br#"{
  "data": [
    {
      "starts_at": {"format_12_hour": "6:00pm", "format_24_hour": "18:00"},
      "ends_at": {"format_12_hour": "6:40pm", "format_24_hour": "18:40"},
      "date": "2024-06-03",
      "venue_slug": "sobell-leisure-centre",
      "spaces": 4,
      "name": "Badminton 40min",
      "category_slug": "badminton-40min",
      "price": {"formatted_amount": "12.00 GBP"}
    },
    {
      "starts_at": {"format_12_hour": "6:40pm", "format_24_hour": "18:40"},
      "ends_at": {"format_12_hour": "7:20pm", "format_24_hour": "19:20"},
      "date": "2024-06-03",
      "venue_slug": "sobell-leisure-centre",
      "spaces": 0,
      "name": "Badminton 40min",
      "category_slug": "badminton-40min"
    }
  ]
}"#;

    const SAMPLE_KEYED: &[u8] = br#"{
  "data": {
    "0": {
      "starts_at": {"format_24_hour": "09:00"},
      "ends_at": {"format_24_hour": "09:40"},
      "date": "2024-06-04",
      "venue_slug": "york-hall-leisure-centre",
      "spaces": 1,
      "name": "Badminton 40min",
      "category_slug": "badminton-40min"
    }
  }
}"#;

    #[test]
    fn test_parse_list_response() {
        let slots = BetterProvider::slots_from_bytes(SAMPLE_LIST, BOOKINGS).unwrap();

        assert_eq!(slots.len(), 2);
        let first = &slots[0];
        assert_eq!(first.venue_slug, "sobell-leisure-centre");
        assert_eq!(first.organisation, ORGANISATION);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(first.starting_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(first.ending_time, NaiveTime::from_hms_opt(18, 40, 0).unwrap());
        assert_eq!(first.spaces, 4);
        assert_eq!(first.name, "Badminton 40min");
        assert_eq!(
            first.booking_url.as_deref(),
            Some("https://bookings.better.org.uk/location/sobell-leisure-centre/badminton-40min/2024-06-03/by-time/slot/18:00-18:40")
        );
        // full slots are kept here; the store query filters them
        assert_eq!(slots[1].spaces, 0);
    }

    #[test]
    fn test_parse_keyed_response() {
        let slots = BetterProvider::slots_from_bytes(SAMPLE_KEYED, BOOKINGS).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].venue_slug, "york-hall-leisure-centre");
    }

    #[test]
    fn test_keyed_entries_keep_numeric_order() {
        let entry = |start: &str, end: &str| {
            format!(
                r#"{{"starts_at": {{"format_24_hour": "{}"}}, "ends_at": {{"format_24_hour": "{}"}}, "date": "2024-06-04", "venue_slug": "sobell-leisure-centre", "spaces": 1, "name": "Badminton 40min", "category_slug": "badminton-40min"}}"#,
                start, end
            )
        };
        let body = format!(
            r#"{{"data": {{"10": {}, "2": {}, "0": {}}}}}"#,
            entry("20:00", "20:40"),
            entry("19:20", "20:00"),
            entry("18:00", "18:40"),
        );

        let slots = BetterProvider::slots_from_bytes(body.as_bytes(), BOOKINGS).unwrap();

        let starts: Vec<String> = slots
            .iter()
            .map(|s| s.starting_time.format("%H:%M").to_string())
            .collect();
        assert_eq!(starts, vec!["18:00", "19:20", "20:00"]);
    }

    #[test]
    fn test_parse_empty_data() {
        let slots = BetterProvider::slots_from_bytes(br#"{"data": []}"#, BOOKINGS).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_provider_error() {
        let result = BetterProvider::slots_from_bytes(b"<html>maintenance</html>", BOOKINGS);
        assert!(matches!(result, Err(CourtScanError::ProviderParse(_))));
    }

    #[test]
    fn test_parse_bad_time_is_provider_error() {
        let body = br#"{"data": [{"starts_at": {"format_24_hour": "late"}, "ends_at": {"format_24_hour": "19:00"}, "date": "2024-06-03", "venue_slug": "x", "spaces": 1, "name": "n", "category_slug": "c"}]}"#;
        let result = BetterProvider::slots_from_bytes(body, BOOKINGS);
        assert!(matches!(result, Err(CourtScanError::ProviderParse(_))));
    }

    #[test]
    fn test_times_url() {
        let provider = BetterProvider::new(&Config::for_tests());

        let url = provider
            .times_url("sobell-leisure-centre", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://better-admin.org.uk/api/activities/venue/sobell-leisure-centre/activity/badminton-40min/times?date=2024-06-03"
        );
    }

    #[test]
    fn test_venues_belong_to_better() {
        let provider = BetterProvider::new(&Config::for_tests());
        let venues = provider.venues();

        assert_eq!(venues.len(), VENUES.len());
        assert!(venues.iter().all(|v| v.organisation == ORGANISATION));
    }
}
