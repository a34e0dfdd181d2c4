use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct EventDescription(String);

impl EventDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}
