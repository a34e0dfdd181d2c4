use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct EventVenue(String);

impl EventVenue {
    pub fn new(venue: impl Into<String>) -> Self {
        Self(venue.into())
    }
}
