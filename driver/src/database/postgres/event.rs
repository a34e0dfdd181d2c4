use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::EventQuery;
use kernel::interface::update::EventModifier;
use kernel::prelude::entity::{
    AvailableSeats, Event, EventDescription, EventId, EventStartsAt, EventTitle, EventVenue,
    TicketPrice, TotalSeats,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresEventRepository;

#[async_trait::async_trait]
impl EventQuery for PostgresEventRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Event>, KernelError> {
        PgEventInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        PgEventInternal::find_by_id(con, id).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        PgEventInternal::find_by_id_for_update(con, id).await
    }
}

#[async_trait::async_trait]
impl EventModifier for PostgresEventRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError> {
        PgEventInternal::create(con, event).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError> {
        PgEventInternal::update(con, event).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        event_id: &EventId,
    ) -> error_stack::Result<(), KernelError> {
        PgEventInternal::delete(con, event_id).await
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    starts_at: OffsetDateTime,
    venue: String,
    total_seats: i32,
    available_seats: i32,
    price: i64,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event::new(
            EventId::new(row.id),
            EventTitle::new(row.title),
            EventDescription::new(row.description),
            EventStartsAt::new(row.starts_at),
            EventVenue::new(row.venue),
            TotalSeats::new(row.total_seats),
            AvailableSeats::new(row.available_seats),
            TicketPrice::new(row.price),
        )
    }
}

pub(in crate::database) struct PgEventInternal;

impl PgEventInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Event>, KernelError> {
        let rows = sqlx::query_as::<_, EventRow>(
            // language=postgresql
            r#"
            SELECT id, title, description, starts_at, venue, total_seats, available_seats, price
            FROM events
            ORDER BY starts_at
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        let row = sqlx::query_as::<_, EventRow>(
            // language=postgresql
            r#"
            SELECT id, title, description, starts_at, venue, total_seats, available_seats, price
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Event::from))
    }

    #[tracing::instrument(skip_all, fields(event_id = %id.as_ref()))]
    async fn find_by_id_for_update(
        con: &mut PgConnection,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError> {
        let row = sqlx::query_as::<_, EventRow>(
            // language=postgresql
            r#"
            SELECT id, title, description, starts_at, venue, total_seats, available_seats, price
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Event::from))
    }

    async fn create(con: &mut PgConnection, event: &Event) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO events (id, title, description, starts_at, venue, total_seats, available_seats, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id().as_ref())
        .bind(event.title().as_ref())
        .bind(event.description().as_ref())
        .bind(event.starts_at().as_ref())
        .bind(event.venue().as_ref())
        .bind(event.total_seats().as_ref())
        .bind(event.available_seats().as_ref())
        .bind(event.price().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(event_id = %event.id().as_ref()))]
    async fn update(con: &mut PgConnection, event: &Event) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, starts_at = $4, venue = $5,
                total_seats = $6, available_seats = $7, price = $8, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(event.id().as_ref())
        .bind(event.title().as_ref())
        .bind(event.description().as_ref())
        .bind(event.starts_at().as_ref())
        .bind(event.venue().as_ref())
        .bind(event.total_seats().as_ref())
        .bind(event.available_seats().as_ref())
        .bind(event.price().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, event_id: &EventId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::EventQuery;
    use kernel::interface::update::EventModifier;
    use kernel::prelude::entity::{
        AvailableSeats, Event, EventDescription, EventId, EventStartsAt, EventTitle, EventVenue,
        SeatCount, TicketPrice, TotalSeats,
    };
    use kernel::KernelError;

    use crate::database::postgres::event::PostgresEventRepository;
    use crate::database::postgres::test::database;

    pub fn event(total_seats: i32, price: i64) -> Event {
        Event::new(
            EventId::new(Uuid::new_v4()),
            EventTitle::new("Live Concert"),
            EventDescription::new("Open air"),
            EventStartsAt::new(datetime!(2030-07-01 18:00 UTC)),
            EventVenue::new("Arena"),
            TotalSeats::new(total_seats),
            AvailableSeats::new(total_seats),
            TicketPrice::new(price),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut connection = db.transact().await?;
        let event = event(100, 1500);
        let id = event.id().clone();

        PostgresEventRepository
            .create(&mut connection, &event)
            .await?;
        let found = PostgresEventRepository
            .find_by_id(&mut connection, &id)
            .await?;
        assert_eq!(found, Some(event.clone()));

        let event = event.reserve(&SeatCount::new(3))?;
        PostgresEventRepository
            .update(&mut connection, &event)
            .await?;
        let found = PostgresEventRepository
            .find_by_id_for_update(&mut connection, &id)
            .await?;
        assert_eq!(found, Some(event));

        PostgresEventRepository
            .delete(&mut connection, &id)
            .await?;
        let found = PostgresEventRepository
            .find_by_id(&mut connection, &id)
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn available_seats_are_range_checked() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut connection = db.transact().await?;
        let event = event(10, 100);
        PostgresEventRepository
            .create(&mut connection, &event)
            .await?;

        let broken = event.reconstruct(|event| event.available_seats = AvailableSeats::new(11));
        let result = PostgresEventRepository
            .update(&mut connection, &broken)
            .await;
        assert!(result.is_err());
        Ok(())
    }
}
