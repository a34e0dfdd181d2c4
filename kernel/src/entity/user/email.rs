use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Unique per user. Stored lower-cased so lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_lowercase())
    }
}
