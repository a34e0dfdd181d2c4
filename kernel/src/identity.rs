use crate::entity::{AuthorizationCode, OAuthProfile, OAuthState};
use crate::KernelError;

#[async_trait::async_trait]
pub trait IdentityProvider: 'static + Sync + Send {
    /// Consent page the user is sent to.
    fn authorization_url(&self, state: &OAuthState) -> error_stack::Result<String, KernelError>;

    /// Exchanges the code returned by the provider for the user's verified profile.
    async fn fetch_profile(
        &self,
        code: &AuthorizationCode,
    ) -> error_stack::Result<OAuthProfile, KernelError>;
}

pub trait DependOnIdentityProvider: 'static + Sync + Send {
    type IdentityProvider: IdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider;
}
