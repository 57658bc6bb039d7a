pub mod availability_service;
pub mod refresh_service;

pub use availability_service::AvailabilityService;
pub use refresh_service::{date_window, ProviderRefresh, RefreshDecision, RefreshService};
