use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::{AsRefln, Fromln, References};

use crate::entity::{UserId, UserRole};

/// Opaque bearer token handed to the client after sign in.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References)]
pub struct Session {
    token: SessionToken,
    user_id: UserId,
    role: UserRole,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
}

impl Session {
    pub fn new(
        token: SessionToken,
        user_id: UserId,
        role: UserRole,
        expires_at: OffsetDateTime,
    ) -> Self {
        Self {
            token,
            user_id,
            role,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
