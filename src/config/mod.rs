use crate::errors::{CourtScanError, CourtResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub better_api_url: String,
    pub better_bookings_url: String,
    pub better_activity: String,
    pub citysport_url: String,
    pub citysport_activity: String,
    pub refresh_interval_minutes: i64,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> CourtResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        // Default db_path is relative to executable directory
        let db_path = std::env::var("COURTSCAN_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("courtscan.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./courtscan.db".to_string())
        });

        Ok(Self {
            db_path,
            better_api_url: env_or("BETTER_API_URL", "https://better-admin.org.uk"),
            better_bookings_url: env_or("BETTER_BOOKINGS_URL", "https://bookings.better.org.uk"),
            better_activity: env_or("BETTER_ACTIVITY", "badminton-40min"),
            citysport_url: env_or("CITYSPORT_URL", "https://bookings.citysport.org.uk"),
            citysport_activity: env_or("CITYSPORT_ACTIVITY", "Badminton"),
            refresh_interval_minutes: parse_env("REFRESH_INTERVAL_MINUTES", 60)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            better_api_url: "https://better-admin.org.uk/".to_string(),
            better_bookings_url: "https://bookings.better.org.uk".to_string(),
            better_activity: "badminton-40min".to_string(),
            citysport_url: "https://bookings.citysport.org.uk".to_string(),
            citysport_activity: "Badminton".to_string(),
            refresh_interval_minutes: 60,
            http_timeout_secs: 5,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> CourtResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CourtScanError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
