pub mod finder;
pub mod formatter;

pub use finder::{ConsecutiveGroupFinder, DEFAULT_CONSECUTIVE_COUNT};
pub use formatter::{GroupingFormatter, VenueLookup, DISTANCE_PLACEHOLDER};
