use chrono::{Duration, Local, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use courtscan::cli::{Cli, Commands};
use courtscan::config::Config;
use courtscan::errors::{CourtResult, CourtScanError};
use courtscan::providers::ProviderRegistry;
use courtscan::services::{AvailabilityService, RefreshDecision, RefreshService};
use courtscan::storage::sqlite::{
    SqliteRefreshStatusRepository, SqliteSlotRepository, SqliteStorage, SqliteVenueRepository,
};
use courtscan::storage::{RefreshStatusRepository, SlotQuery, SlotRepository, VenueRepository};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> CourtResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let slot_repo = SqliteSlotRepository::new(storage.clone());
    let venue_repo = SqliteVenueRepository::new(storage.clone());
    let status_repo = SqliteRefreshStatusRepository::new(storage);

    match cli.command {
        Commands::Refresh { force, provider } => cmd_refresh(
            slot_repo,
            venue_repo,
            status_repo,
            &config,
            force,
            provider.as_deref(),
        ),
        Commands::Groups {
            count,
            from,
            to,
            start_date,
            end_date,
            json,
        } => {
            let query = build_query(from, to, start_date, end_date)?;
            cmd_groups(slot_repo, venue_repo, &query, count as usize, json)
        }
        Commands::Venues => cmd_venues(venue_repo),
        Commands::Status => cmd_status(slot_repo, status_repo),
    }
}

fn build_query(
    from: NaiveTime,
    to: NaiveTime,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> CourtResult<SlotQuery> {
    let starting_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let ending_date =
        end_date.unwrap_or(starting_date + Duration::days(SlotQuery::DEFAULT_DAYS_AHEAD));

    if ending_date < starting_date {
        return Err(CourtScanError::InvalidInput(format!(
            "End date {} is before start date {}",
            ending_date, starting_date
        )));
    }

    Ok(SlotQuery {
        starting_time: from,
        ending_time: to,
        starting_date,
        ending_date,
    })
}

fn cmd_refresh(
    slot_repo: SqliteSlotRepository,
    venue_repo: SqliteVenueRepository,
    status_repo: SqliteRefreshStatusRepository,
    config: &Config,
    force: bool,
    provider: Option<&str>,
) -> CourtResult<()> {
    let registry = ProviderRegistry::from_config(config)?;
    let service = RefreshService::new(
        slot_repo,
        venue_repo,
        status_repo,
        registry,
        Duration::minutes(config.refresh_interval_minutes),
    );

    if !force {
        match service.decide(Utc::now())? {
            RefreshDecision::Refresh => {}
            RefreshDecision::AlreadyRunning { since } => {
                println!("A refresh is already running (since {}).", since.to_rfc3339());
                return Ok(());
            }
            RefreshDecision::UpToDate { last_update } => {
                println!(
                    "Slots are up to date (last refresh {}). Use --force to refresh anyway.",
                    last_update.to_rfc3339()
                );
                return Ok(());
            }
        }
    }

    println!("Refreshing slots...\n");

    let summary = service.refresh(Local::now().date_naive(), provider)?;

    for result in &summary {
        println!(
            "  {}: {} slots from {} venues ({} to {})",
            result.organisation, result.slots, result.venues, result.first_date, result.last_date
        );
    }
    println!();
    println!(
        "Refresh complete: {} slots stored.",
        summary.iter().map(|r| r.slots).sum::<usize>()
    );

    Ok(())
}

fn cmd_groups(
    slot_repo: SqliteSlotRepository,
    venue_repo: SqliteVenueRepository,
    query: &SlotQuery,
    count: usize,
    json: bool,
) -> CourtResult<()> {
    let service = AvailabilityService::new(slot_repo, venue_repo);
    let records = service.consecutive_groupings(query, count)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No consecutive slots found.");
        return Ok(());
    }

    println!("{} consecutive slots:\n", count);
    for record in &records {
        println!("  {}", record.format());
        println!("    {}", record.distance);
    }
    println!();
    println!("Found {} groupings.", records.len());

    Ok(())
}

fn cmd_venues(venue_repo: SqliteVenueRepository) -> CourtResult<()> {
    let venues = venue_repo.get_all()?;

    if venues.is_empty() {
        println!("No venues stored. Run `courtscan refresh` first.");
        return Ok(());
    }

    println!("Venues:\n");
    for venue in venues {
        println!("  {} [{}]", venue.venue_name, venue.organisation);
        println!("    Slug: {}", venue.slug);
    }

    Ok(())
}

fn cmd_status(
    slot_repo: SqliteSlotRepository,
    status_repo: SqliteRefreshStatusRepository,
) -> CourtResult<()> {
    match status_repo.get()? {
        Some(record) => println!(
            "Refresh status: {} (updated {})",
            record.status,
            record.last_update.to_rfc3339()
        ),
        None => println!("Refresh status: never refreshed"),
    }
    println!("Stored slots: {}", slot_repo.count()?);

    Ok(())
}
