use destructure::Destructure;
use vodca::{AsRefln, Fromln, References};

use crate::entity::{UserEmail, UserName};

/// Anti-forgery value round-tripped through the OAuth provider.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct OAuthState(String);

impl OAuthState {
    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

/// Identity the provider vouches for.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct OAuthProfile {
    name: UserName,
    email: UserEmail,
}

impl OAuthProfile {
    pub fn new(name: UserName, email: UserEmail) -> Self {
        Self { name, email }
    }
}
