use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::identity::{DependOnIdentityProvider, IdentityProvider};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::session::{
    DependOnOAuthStateStore, DependOnSessionStore, OAuthStateStore, SessionStore,
};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{
    AuthorizationCode, DestructOAuthProfile, OAuthState, SessionToken, User, UserId, UserRole,
};
use kernel::KernelError;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::{ActorDto, SessionDto, SessionTokenDto, SignInDto, UserDto};

#[async_trait::async_trait]
pub trait BeginSignInService:
    'static + Sync + Send + DependOnOAuthStateStore + DependOnIdentityProvider
{
    /// Returns the provider URL the browser should be redirected to.
    async fn begin_sign_in(&self) -> error_stack::Result<String, KernelError> {
        let state = self.oauth_state_store().issue().await?;
        self.identity_provider().authorization_url(&state)
    }
}

impl<T> BeginSignInService for T where T: DependOnOAuthStateStore + DependOnIdentityProvider {}

#[async_trait::async_trait]
pub trait SignInService:
    'static
    + Sync
    + Send
    + DependOnOAuthStateStore
    + DependOnIdentityProvider
    + DependOnUserQuery
    + DependOnUserModifier
    + DependOnSessionStore
{
    async fn sign_in(&self, dto: SignInDto) -> error_stack::Result<SessionDto, KernelError> {
        let state = OAuthState::new(dto.state);
        if !self.oauth_state_store().consume(&state).await? {
            return Err(Report::new(KernelError::Unauthorized)
                .attach_printable("Unknown or already used OAuth state"));
        }

        let profile = self
            .identity_provider()
            .fetch_profile(&AuthorizationCode::new(dto.code))
            .await?;
        let DestructOAuthProfile { name, email } = profile.into_destruct();

        let mut connection = self.database_connection().transact().await?;
        let user = match self
            .user_query()
            .find_by_email(&mut connection, &email)
            .await?
        {
            Some(user) => user,
            None => {
                let user = User::new(UserId::new(Uuid::new_v4()), name, email, UserRole::User);
                self.user_modifier()
                    .create(&mut connection, &user)
                    .await?;
                tracing::info!(user_id = %user.id().as_ref(), "User registered");
                user
            }
        };
        connection.commit().await?;

        let session = self.session_store().issue(&user).await?;
        tracing::info!(user_id = %user.id().as_ref(), "Signed in");
        Ok(SessionDto::new(session, user))
    }
}

impl<T> SignInService for T where
    T: DependOnOAuthStateStore
        + DependOnIdentityProvider
        + DependOnUserQuery
        + DependOnUserModifier
        + DependOnSessionStore
{
}

#[async_trait::async_trait]
pub trait SessionService: 'static + Sync + Send + DependOnSessionStore + DependOnUserQuery {
    /// Maps a bearer token to the caller it was issued for.
    async fn resolve_session(
        &self,
        dto: SessionTokenDto,
    ) -> error_stack::Result<ActorDto, KernelError> {
        let token = SessionToken::new(dto.token);
        let session = self
            .session_store()
            .find(&token)
            .await?
            .filter(|session| !session.is_expired_at(OffsetDateTime::now_utc()))
            .ok_or_else(|| {
                Report::new(KernelError::Unauthorized).attach_printable("Session not found")
            })?;
        Ok(ActorDto::from(&session))
    }

    async fn sign_out(&self, dto: SessionTokenDto) -> error_stack::Result<(), KernelError> {
        self.session_store()
            .revoke(&SessionToken::new(dto.token))
            .await
    }

    async fn get_current_user(&self, actor: ActorDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_id(&mut connection, &actor.user_id())
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Unauthorized)
                    .attach_printable(format!("User {} no longer exists", actor.user_id))
            })?;
        Ok(UserDto::from(user))
    }
}

impl<T> SessionService for T where T: DependOnSessionStore + DependOnUserQuery {}
