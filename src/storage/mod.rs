pub mod traits;
pub mod sqlite;

pub use traits::{RefreshStatusRepository, SlotQuery, SlotRepository, VenueRepository};
pub use sqlite::{SqliteRefreshStatusRepository, SqliteSlotRepository, SqliteStorage, SqliteVenueRepository};
