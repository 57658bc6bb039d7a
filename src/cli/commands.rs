use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use crate::grouping::DEFAULT_CONSECUTIVE_COUNT;

#[derive(Parser)]
#[command(name = "courtscan")]
#[command(about = "Sports court availability scraper with consecutive slot groupings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape every provider and replace the stored slots
    Refresh {
        /// Refresh even if the last run is recent or still marked as running
        #[arg(long)]
        force: bool,

        /// Only refresh this organisation (e.g. better.org.uk)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show runs of back-to-back bookable slots at the same venue
    Groups {
        /// Number of consecutive slots per grouping (at least 2)
        #[arg(short, long, default_value_t = DEFAULT_CONSECUTIVE_COUNT as u64,
              value_parser = clap::value_parser!(u64).range(2..))]
        count: u64,

        /// Earliest slot start time (HH:MM)
        #[arg(long, value_parser = parse_time, default_value = "18:00")]
        from: NaiveTime,

        /// Latest slot end time (HH:MM)
        #[arg(long, value_parser = parse_time, default_value = "22:00")]
        to: NaiveTime,

        /// First date to search (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        start_date: Option<NaiveDate>,

        /// Last date to search (YYYY-MM-DD, defaults to three days after the start)
        #[arg(long, value_parser = parse_date)]
        end_date: Option<NaiveDate>,

        /// Print the groupings as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored venues
    Venues,

    /// Show the last refresh status and number of stored slots
    Status,
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}', expected HH:MM", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}
