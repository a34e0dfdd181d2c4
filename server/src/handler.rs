use driver::database::{
    PostgresBookingRepository, PostgresDatabase, PostgresEventRepository, PostgresUserRepository,
    RedisDatabase, RedisOAuthStateStore, RedisSessionStore,
};
use driver::identity::GoogleIdentityProvider;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::DependOnIdentityProvider;
use kernel::interface::query::{DependOnBookingQuery, DependOnEventQuery, DependOnUserQuery};
use kernel::interface::session::{DependOnOAuthStateStore, DependOnSessionStore};
use kernel::interface::update::{
    DependOnBookingModifier, DependOnEventModifier, DependOnUserModifier,
};
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    redis: RedisDatabase,
    session_store: RedisSessionStore,
    oauth_state_store: RedisOAuthStateStore,
    identity_provider: GoogleIdentityProvider,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        pgpool.migrate().await?;
        let redis = RedisDatabase::new()?;
        let session_store = RedisSessionStore::new(redis.clone())?;
        let oauth_state_store = RedisOAuthStateStore::new(redis.clone());
        let identity_provider = GoogleIdentityProvider::new()?;

        Ok(Self {
            pgpool,
            redis,
            session_store,
            oauth_state_store,
            identity_provider,
        })
    }

    pub async fn shutdown(&self) {
        self.pgpool.close().await;
        self.redis.close();
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnEventQuery for Handler {
    type EventQuery = PostgresEventRepository;
    fn event_query(&self) -> &Self::EventQuery {
        &PostgresEventRepository
    }
}

impl DependOnEventModifier for Handler {
    type EventModifier = PostgresEventRepository;
    fn event_modifier(&self) -> &Self::EventModifier {
        &PostgresEventRepository
    }
}

impl DependOnBookingQuery for Handler {
    type BookingQuery = PostgresBookingRepository;
    fn booking_query(&self) -> &Self::BookingQuery {
        &PostgresBookingRepository
    }
}

impl DependOnBookingModifier for Handler {
    type BookingModifier = PostgresBookingRepository;
    fn booking_modifier(&self) -> &Self::BookingModifier {
        &PostgresBookingRepository
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for Handler {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnSessionStore for Handler {
    type SessionStore = RedisSessionStore;
    fn session_store(&self) -> &Self::SessionStore {
        &self.session_store
    }
}

impl DependOnOAuthStateStore for Handler {
    type OAuthStateStore = RedisOAuthStateStore;
    fn oauth_state_store(&self) -> &Self::OAuthStateStore {
        &self.oauth_state_store
    }
}

impl DependOnIdentityProvider for Handler {
    type IdentityProvider = GoogleIdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &self.identity_provider
    }
}
