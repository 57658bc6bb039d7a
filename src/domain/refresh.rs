use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineRefreshStatus {
    Running,
    Completed,
    Failed,
}

impl PipelineRefreshStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineRefreshStatus::Running => "running",
            PipelineRefreshStatus::Completed => "completed",
            PipelineRefreshStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for PipelineRefreshStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(PipelineRefreshStatus::Running),
            "completed" => Ok(PipelineRefreshStatus::Completed),
            "failed" => Ok(PipelineRefreshStatus::Failed),
            _ => Err(format!("Unknown refresh status: {}", s)),
        }
    }
}

impl std::fmt::Display for PipelineRefreshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshStatusRecord {
    pub status: PipelineRefreshStatus,
    pub last_update: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            PipelineRefreshStatus::Running,
            PipelineRefreshStatus::Completed,
            PipelineRefreshStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<PipelineRefreshStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("RUNNING".parse(), Ok(PipelineRefreshStatus::Running));
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("obsolete".parse::<PipelineRefreshStatus>().is_err());
    }
}
