pub mod traits;
pub mod better;
pub mod citysport;
pub mod registry;

pub use traits::ProviderFeed;
pub use registry::ProviderRegistry;
