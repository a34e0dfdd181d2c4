use crate::entity::{OAuthState, Session, SessionToken, User};
use crate::KernelError;

#[async_trait::async_trait]
pub trait SessionStore: 'static + Sync + Send {
    /// Creates a fresh token for `user`, valid for the configured lifetime.
    async fn issue(&self, user: &User) -> error_stack::Result<Session, KernelError>;

    /// `None` when the token is unknown or has expired.
    async fn find(
        &self,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError>;

    async fn revoke(&self, token: &SessionToken) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnSessionStore: 'static + Sync + Send {
    type SessionStore: SessionStore;
    fn session_store(&self) -> &Self::SessionStore;
}

#[async_trait::async_trait]
pub trait OAuthStateStore: 'static + Sync + Send {
    async fn issue(&self) -> error_stack::Result<OAuthState, KernelError>;

    /// Returns whether `state` was issued and not yet used. A state can be
    /// consumed once.
    async fn consume(&self, state: &OAuthState) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnOAuthStateStore: 'static + Sync + Send {
    type OAuthStateStore: OAuthStateStore;
    fn oauth_state_store(&self) -> &Self::OAuthStateStore;
}
