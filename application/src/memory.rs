//! In-process store used by the service tests.
//!
//! A transaction holds the whole store locked and works on a staged copy, so
//! concurrent service calls run one after another and a dropped transaction
//! leaves nothing behind. Rows must be read with `find_by_id_for_update` in the
//! same transaction before they are updated or deleted; otherwise the write
//! fails with `Internal`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::identity::{DependOnIdentityProvider, IdentityProvider};
use kernel::interface::query::{
    BookingQuery, DependOnBookingQuery, DependOnEventQuery, DependOnUserQuery, EventQuery,
    UserQuery,
};
use kernel::interface::session::{
    DependOnOAuthStateStore, DependOnSessionStore, OAuthStateStore, SessionStore,
};
use kernel::interface::update::{
    BookingModifier, DependOnBookingModifier, DependOnEventModifier, DependOnUserModifier,
    EventModifier, UserModifier,
};
use kernel::prelude::entity::{
    AuthorizationCode, AvailableSeats, Booking, BookingDetail, Event, EventDescription, EventId,
    EventStartsAt, EventTitle, EventVenue, OAuthProfile, OAuthState, Session, SessionToken,
    TicketPrice, TotalSeats, User, UserEmail, UserId, UserName, UserRole,
};
use kernel::KernelError;
use time::{Duration, OffsetDateTime};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::transfer::ActorDto;

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    events: HashMap<Uuid, Event>,
    bookings: Vec<Booking>,
    users: HashMap<Uuid, User>,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

pub(crate) struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    locked_events: HashSet<Uuid>,
    locked_bookings: HashSet<Uuid>,
}

fn ensure_locked(
    locked: &HashSet<Uuid>,
    id: &Uuid,
    table: &str,
) -> error_stack::Result<(), KernelError> {
    if locked.contains(id) {
        return Ok(());
    }
    Err(Report::new(KernelError::Internal)
        .attach_printable(format!("{table} row {id} written without a row lock")))
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryTransaction {
            guard,
            staged,
            locked_events: HashSet::new(),
            locked_bookings: HashSet::new(),
        })
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self) -> error_stack::Result<(), KernelError> {
        *self.guard = self.staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

pub(crate) struct MemoryEventRepository;

#[async_trait::async_trait]
impl EventQuery for MemoryEventRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Event>, KernelError> {
        let mut events = con.staged.events.values().cloned().collect::<Vec<_>>();
        events.sort_by_key(|event| *event.starts_at().as_ref());
        Ok(events)
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        Ok(con.staged.events.get(id.as_ref()).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        con.locked_events.insert(*id.as_ref());
        self.find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl EventModifier for MemoryEventRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError> {
        con.staged
            .events
            .insert(*event.id().as_ref(), event.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError> {
        ensure_locked(&con.locked_events, event.id().as_ref(), "events")?;
        let available = *event.available_seats().as_ref();
        if available < 0 || available > *event.total_seats().as_ref() {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("available_seats out of range"));
        }
        match con.staged.events.get_mut(event.id().as_ref()) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::NotFound)),
        }
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        event_id: &EventId,
    ) -> error_stack::Result<(), KernelError> {
        ensure_locked(&con.locked_events, event_id.as_ref(), "events")?;
        con.staged.events.remove(event_id.as_ref());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryBookingRepository {
    fail_inserts: AtomicBool,
}

fn detail(state: &MemoryState, booking: &Booking) -> error_stack::Result<BookingDetail, KernelError> {
    let event = state.events.get(booking.event_id().as_ref());
    let user = state.users.get(booking.user_id().as_ref());
    match (event, user) {
        (Some(event), Some(user)) => Ok(BookingDetail::new(
            booking.clone(),
            event.clone(),
            user.clone(),
        )),
        _ => Err(Report::new(KernelError::Internal).attach_printable("dangling booking")),
    }
}

#[async_trait::async_trait]
impl BookingQuery for MemoryBookingRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &kernel::prelude::entity::BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(con
            .staged
            .bookings
            .iter()
            .find(|booking| booking.id() == id)
            .cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &kernel::prelude::entity::BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        con.locked_bookings.insert(*id.as_ref());
        self.find_by_id(con, id).await
    }

    async fn find_all_details(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<BookingDetail>, KernelError> {
        con.staged
            .bookings
            .iter()
            .rev()
            .map(|booking| detail(&con.staged, booking))
            .collect()
    }

    async fn find_details_by_user_id(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingDetail>, KernelError> {
        con.staged
            .bookings
            .iter()
            .rev()
            .filter(|booking| booking.is_owned_by(user_id))
            .map(|booking| detail(&con.staged, booking))
            .collect()
    }

    async fn count_by_event_id(
        &self,
        con: &mut MemoryTransaction,
        event_id: &EventId,
    ) -> error_stack::Result<i64, KernelError> {
        let count = con
            .staged
            .bookings
            .iter()
            .filter(|booking| booking.event_id() == event_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait::async_trait]
impl BookingModifier for MemoryBookingRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Internal).attach_printable("insert failed"));
        }
        detail(&con.staged, booking)?;
        con.staged.bookings.push(booking.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        ensure_locked(&con.locked_bookings, booking.id().as_ref(), "bookings")?;
        match con
            .staged
            .bookings
            .iter_mut()
            .find(|stored| stored.id() == booking.id())
        {
            Some(stored) => {
                *stored = booking.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::NotFound)),
        }
    }
}

pub(crate) struct MemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.staged.users.get(id.as_ref()).cloned())
    }

    async fn find_by_email(
        &self,
        con: &mut MemoryTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con
            .staged
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.users.values().any(|other| other.email() == user.email()) {
            return Err(Report::new(KernelError::Concurrency).attach_printable("duplicate email"));
        }
        con.staged.users.insert(*user.id().as_ref(), user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    states: Mutex<HashSet<String>>,
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn issue(&self, user: &User) -> error_stack::Result<Session, KernelError> {
        let session = Session::new(
            SessionToken::new(Uuid::new_v4().simple().to_string()),
            user.id().clone(),
            *user.role(),
            OffsetDateTime::now_utc() + Duration::hours(1),
        );
        self.sessions
            .lock()
            .await
            .insert(session.token().as_ref().clone(), session.clone());
        Ok(session)
    }

    async fn find(
        &self,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError> {
        Ok(self.sessions.lock().await.get(token.as_ref()).cloned())
    }

    async fn revoke(&self, token: &SessionToken) -> error_stack::Result<(), KernelError> {
        self.sessions.lock().await.remove(token.as_ref());
        Ok(())
    }
}

#[async_trait::async_trait]
impl OAuthStateStore for MemorySessionStore {
    async fn issue(&self) -> error_stack::Result<OAuthState, KernelError> {
        let state = Uuid::new_v4().simple().to_string();
        self.states.lock().await.insert(state.clone());
        Ok(OAuthState::new(state))
    }

    async fn consume(&self, state: &OAuthState) -> error_stack::Result<bool, KernelError> {
        Ok(self.states.lock().await.remove(state.as_ref()))
    }
}

/// Accepts any code and vouches for `<code>@example.com`.
pub(crate) struct FakeIdentityProvider;

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn authorization_url(&self, state: &OAuthState) -> error_stack::Result<String, KernelError> {
        Ok(format!(
            "https://accounts.example.com/auth?state={}",
            state.as_ref()
        ))
    }

    async fn fetch_profile(
        &self,
        code: &AuthorizationCode,
    ) -> error_stack::Result<OAuthProfile, KernelError> {
        Ok(OAuthProfile::new(
            UserName::new(code.as_ref().clone()),
            UserEmail::new(format!("{}@example.com", code.as_ref())),
        ))
    }
}

#[derive(Clone)]
pub(crate) struct TestModule(Arc<Inner>);

pub(crate) struct Inner {
    database: MemoryDatabase,
    events: MemoryEventRepository,
    bookings: MemoryBookingRepository,
    users: MemoryUserRepository,
    sessions: MemorySessionStore,
    identity: FakeIdentityProvider,
}

impl TestModule {
    pub fn new() -> Self {
        Self(Arc::new(Inner {
            database: MemoryDatabase::default(),
            events: MemoryEventRepository,
            bookings: MemoryBookingRepository::default(),
            users: MemoryUserRepository,
            sessions: MemorySessionStore::default(),
            identity: FakeIdentityProvider,
        }))
    }

    pub async fn seed_user(&self, role: UserRole) -> ActorDto {
        let id = Uuid::new_v4();
        let user = User::new(
            UserId::new(id),
            UserName::new(format!("user-{id}")),
            UserEmail::new(format!("{id}@example.com")),
            role,
        );
        self.0.database.state.lock().await.users.insert(id, user);
        ActorDto { user_id: id, role }
    }

    pub async fn seed_event(&self, total_seats: i32, price: i64) -> Uuid {
        let id = Uuid::new_v4();
        let total_seats = TotalSeats::new(total_seats);
        let event = Event::new(
            EventId::new(id),
            EventTitle::new("Live Concert"),
            EventDescription::default(),
            EventStartsAt::new(OffsetDateTime::now_utc() + Duration::days(30)),
            EventVenue::new("Arena"),
            total_seats,
            AvailableSeats::from(total_seats),
            TicketPrice::new(price),
        );
        self.0.database.state.lock().await.events.insert(id, event);
        id
    }

    pub async fn seed_expired_session(&self, actor: &ActorDto) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let session = Session::new(
            SessionToken::new(token.clone()),
            actor.user_id(),
            actor.role,
            OffsetDateTime::now_utc() - Duration::minutes(1),
        );
        self.0
            .sessions
            .sessions
            .lock()
            .await
            .insert(token.clone(), session);
        token
    }

    pub async fn available_seats(&self, event_id: Uuid) -> i32 {
        let state = self.0.database.state.lock().await;
        state
            .events
            .get(&event_id)
            .map(|event| *event.available_seats().as_ref())
            .expect("event was seeded")
    }

    /// Seats held by bookings that are not cancelled.
    pub async fn active_seats(&self, event_id: Uuid) -> i32 {
        let state = self.0.database.state.lock().await;
        state
            .bookings
            .iter()
            .filter(|booking| booking.event_id().as_ref() == &event_id)
            .filter(|booking| booking.status().is_active())
            .map(|booking| *booking.seat_count().as_ref())
            .sum()
    }

    pub async fn booking_count(&self) -> usize {
        self.0.database.state.lock().await.bookings.len()
    }

    /// Removes an event behind the bookings that still point at it.
    pub async fn drop_event(&self, event_id: Uuid) {
        self.0.database.state.lock().await.events.remove(&event_id);
    }

    pub fn fail_booking_inserts(&self) {
        self.0.bookings.fail_inserts.store(true, Ordering::SeqCst);
    }
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = MemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.0.database
    }
}

impl DependOnEventQuery for TestModule {
    type EventQuery = MemoryEventRepository;
    fn event_query(&self) -> &Self::EventQuery {
        &self.0.events
    }
}

impl DependOnEventModifier for TestModule {
    type EventModifier = MemoryEventRepository;
    fn event_modifier(&self) -> &Self::EventModifier {
        &self.0.events
    }
}

impl DependOnBookingQuery for TestModule {
    type BookingQuery = MemoryBookingRepository;
    fn booking_query(&self) -> &Self::BookingQuery {
        &self.0.bookings
    }
}

impl DependOnBookingModifier for TestModule {
    type BookingModifier = MemoryBookingRepository;
    fn booking_modifier(&self) -> &Self::BookingModifier {
        &self.0.bookings
    }
}

impl DependOnUserQuery for TestModule {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &self.0.users
    }
}

impl DependOnUserModifier for TestModule {
    type UserModifier = MemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &self.0.users
    }
}

impl DependOnSessionStore for TestModule {
    type SessionStore = MemorySessionStore;
    fn session_store(&self) -> &Self::SessionStore {
        &self.0.sessions
    }
}

impl DependOnOAuthStateStore for TestModule {
    type OAuthStateStore = MemorySessionStore;
    fn oauth_state_store(&self) -> &Self::OAuthStateStore {
        &self.0.sessions
    }
}

impl DependOnIdentityProvider for TestModule {
    type IdentityProvider = FakeIdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &self.0.identity
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{BookingQuery, EventQuery};
    use kernel::interface::update::{BookingModifier, EventModifier};
    use kernel::prelude::entity::{BookingId, EventId, SeatCount, UserRole};
    use kernel::KernelError;

    use crate::memory::{MemoryBookingRepository, MemoryEventRepository, TestModule};
    use crate::service::CreateBookingService;
    use crate::transfer::CreateBookingDto;

    #[tokio::test]
    async fn event_writes_need_a_row_lock() {
        let module = TestModule::new();
        let event_id = EventId::new(module.seed_event(10, 100).await);

        let mut connection = module.0.database.transact().await.unwrap();
        let event = MemoryEventRepository
            .find_by_id(&mut connection, &event_id)
            .await
            .unwrap()
            .unwrap()
            .reserve(&SeatCount::new(2))
            .unwrap();
        let report = MemoryEventRepository
            .update(&mut connection, &event)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);

        MemoryEventRepository
            .find_by_id_for_update(&mut connection, &event_id)
            .await
            .unwrap();
        MemoryEventRepository
            .update(&mut connection, &event)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn booking_status_writes_need_a_row_lock() {
        let module = TestModule::new();
        let user = module.seed_user(UserRole::User).await;
        let event_id = module.seed_event(10, 100).await;
        let booking = module
            .create_booking(CreateBookingDto {
                actor: user,
                event_id,
                seat_count: 1,
            })
            .await
            .unwrap();

        let bookings = MemoryBookingRepository::default();
        let mut connection = module.0.database.transact().await.unwrap();
        let id = BookingId::new(booking.id);
        let cancelled = bookings
            .find_by_id(&mut connection, &id)
            .await
            .unwrap()
            .unwrap()
            .cancel()
            .unwrap();
        let report = bookings
            .update_status(&mut connection, &cancelled)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);

        bookings
            .find_by_id_for_update(&mut connection, &id)
            .await
            .unwrap();
        bookings
            .update_status(&mut connection, &cancelled)
            .await
            .unwrap();
    }
}
