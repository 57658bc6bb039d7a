use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub slug: String,
    pub venue_name: String,
    pub organisation: String,
}

impl VenueRecord {
    pub fn new(slug: String, venue_name: String, organisation: String) -> Self {
        Self {
            slug,
            venue_name,
            organisation,
        }
    }
}
