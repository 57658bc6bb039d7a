pub mod slot;
pub mod venue;
pub mod chain;
pub mod display;
pub mod refresh;

pub use slot::SlotRecord;
pub use venue::VenueRecord;
pub use chain::SlotChain;
pub use display::DisplayRecord;
pub use refresh::{PipelineRefreshStatus, RefreshStatusRecord};
