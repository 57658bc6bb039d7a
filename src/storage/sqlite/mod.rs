mod connection;
mod slot_repository;
mod venue_repository;
mod refresh_repository;

pub use connection::SqliteStorage;
pub use slot_repository::SqliteSlotRepository;
pub use venue_repository::SqliteVenueRepository;
pub use refresh_repository::SqliteRefreshStatusRepository;
