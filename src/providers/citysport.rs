use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::domain::{SlotRecord, VenueRecord};
use crate::errors::{CourtScanError, CourtResult};
use crate::providers::traits::ProviderFeed;

pub const ORGANISATION: &str = "citysport.org.uk";

const DAYS_AHEAD: i64 = 30;

const TIMETABLE_PATH: &str = "/LhWeb/en/Public/Bookings/Timetable";

/// Display names of the Citysport locations; slugs are derived from them
const LOCATIONS: &[&str] = &["Citysport Sports Hall", "Citysport Studio"];

pub struct CitySportProvider {
    client: Client,
    base_url: Url,
    activity: String,
    timetable: TimetableParser,
}

impl CitySportProvider {
    pub fn new(config: &Config) -> CourtResult<Self> {
        let base_url =
            Url::parse(&config.citysport_url).map_err(|e| CourtScanError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            activity: config.citysport_activity.clone(),
            timetable: TimetableParser::new(),
        })
    }

    fn timetable_url(&self, date: NaiveDate) -> CourtResult<Url> {
        let mut url = self
            .base_url
            .join(TIMETABLE_PATH)
            .map_err(|e| CourtScanError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn fetch_day(&self, date: NaiveDate) -> CourtResult<Vec<SlotRecord>> {
        let url = self.timetable_url(date)?;
        debug!(%url, "Requesting Citysport timetable");

        let html = self.client.get(url).send()?.error_for_status()?.text()?;

        Ok(self
            .timetable
            .slots_from_html(&html, date, &self.activity, &self.base_url))
    }
}

/// Selectors and patterns for timetable pages, compiled once per provider.
struct TimetableParser {
    row: Selector,
    name: Selector,
    time: Selector,
    spaces: Selector,
    link: Selector,
    time_range: Regex,
    spaces_count: Regex,
    separator: Regex,
}

impl TimetableParser {
    fn new() -> Self {
        Self {
            row: Selector::parse("tr.activity-slot").unwrap(),
            name: Selector::parse("td.activity-name").unwrap(),
            time: Selector::parse("td.activity-time").unwrap(),
            spaces: Selector::parse("td.activity-spaces").unwrap(),
            link: Selector::parse("td.activity-book a[href]").unwrap(),
            time_range: Regex::new(r"(\d{1,2}:\d{2})\s*[-–]\s*(\d{1,2}:\d{2})").unwrap(),
            spaces_count: Regex::new(r"(\d+)").unwrap(),
            separator: Regex::new(r"[^a-z0-9]+").unwrap(),
        }
    }

    /// Scrape `tr.activity-slot` rows of a timetable page. Rows for other
    /// activities or with unreadable times are skipped.
    fn slots_from_html(&self, html: &str, date: NaiveDate, activity: &str, base_url: &Url) -> Vec<SlotRecord> {
        let document = Html::parse_document(html);
        let activity = activity.to_lowercase();

        let mut slots = Vec::new();

        for row in document.select(&self.row) {
            let name = cell_text(&row, &self.name);
            if !name.to_lowercase().contains(&activity) {
                continue;
            }

            let Some(location) = row.value().attr("data-location") else {
                debug!(%name, "Timetable row without location");
                continue;
            };

            let time_text = cell_text(&row, &self.time);
            let Some(caps) = self.time_range.captures(&time_text) else {
                debug!(%name, time = %time_text, "Timetable row without time range");
                continue;
            };
            let (starting_time, ending_time) = match (parse_clock(&caps[1]), parse_clock(&caps[2])) {
                (Ok(start), Ok(end)) => (start, end),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(%name, time = %time_text, error = %e, "Timetable row with unreadable time");
                    continue;
                }
            };

            let spaces = self
                .spaces_count
                .captures(&cell_text(&row, &self.spaces))
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0);

            let booking_url = row
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base_url.join(href).ok())
                .map(|u| u.to_string());

            slots.push(
                SlotRecord::new(
                    self.slugify(location),
                    ORGANISATION.to_string(),
                    date,
                    starting_time,
                    ending_time,
                )
                .with_name(name)
                .with_spaces(spaces)
                .with_booking_url(booking_url),
            );
        }

        slots
    }

    /// Lowercase, with runs of non-alphanumerics collapsed to single dashes
    fn slugify(&self, name: &str) -> String {
        self.separator
            .replace_all(&name.to_lowercase(), "-")
            .trim_matches('-')
            .to_string()
    }
}

fn cell_text(row: &ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|cell| cell.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn parse_clock(raw: &str) -> CourtResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|e| CourtScanError::ProviderParse(format!("invalid time '{}': {}", raw, e)))
}

impl ProviderFeed for CitySportProvider {
    fn organisation(&self) -> &'static str {
        ORGANISATION
    }

    fn days_ahead(&self) -> i64 {
        DAYS_AHEAD
    }

    fn venues(&self) -> Vec<VenueRecord> {
        LOCATIONS
            .iter()
            .map(|name| {
                VenueRecord::new(self.timetable.slugify(name), name.to_string(), ORGANISATION.to_string())
            })
            .collect()
    }

    fn fetch_slots(&self, dates: &[NaiveDate]) -> CourtResult<Vec<SlotRecord>> {
        let mut slots = Vec::new();

        for date in dates {
            match self.fetch_day(*date) {
                Ok(day_slots) => slots.extend(day_slots),
                Err(e) => warn!(%date, error = %e, "Skipping Citysport date"),
            }
        }

        info!(organisation = ORGANISATION, slots = slots.len(), "Fetched slots");
        Ok(slots)
    }
}
