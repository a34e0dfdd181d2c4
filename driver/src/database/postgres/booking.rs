use std::str::FromStr;

use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookingQuery;
use kernel::interface::update::BookingModifier;
use kernel::prelude::entity::{
    AvailableSeats, Booking, BookingAmount, BookingDetail, BookingId, BookingStatus, CreatedAt,
    Event, EventDescription, EventId, EventStartsAt, EventTitle, EventVenue, SeatCount,
    TicketPrice, TotalSeats, User, UserEmail, UserId, UserName, UserRole,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookingRepository;

#[async_trait::async_trait]
impl BookingQuery for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id(con, id).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id_for_update(con, id).await
    }

    async fn find_all_details(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<BookingDetail>, KernelError> {
        PgBookingInternal::find_details(con, None).await
    }

    async fn find_details_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingDetail>, KernelError> {
        PgBookingInternal::find_details(con, Some(user_id)).await
    }

    async fn count_by_event_id(
        &self,
        con: &mut PostgresTransaction,
        event_id: &EventId,
    ) -> error_stack::Result<i64, KernelError> {
        PgBookingInternal::count_by_event_id(con, event_id).await
    }
}

#[async_trait::async_trait]
impl BookingModifier for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::create(con, booking).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::update_status(con, booking).await
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    seat_count: i32,
    amount: i64,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<BookingRow> for Booking {
    type Error = error_stack::Report<KernelError>;
    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking::new(
            BookingId::new(row.id),
            EventId::new(row.event_id),
            UserId::new(row.user_id),
            SeatCount::new(row.seat_count),
            BookingAmount::new(row.amount),
            BookingStatus::from_str(&row.status)?,
            CreatedAt::new(row.created_at),
        ))
    }
}

#[derive(sqlx::FromRow)]
struct BookingDetailRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    seat_count: i32,
    amount: i64,
    status: String,
    created_at: OffsetDateTime,
    event_title: String,
    event_description: String,
    event_starts_at: OffsetDateTime,
    event_venue: String,
    event_total_seats: i32,
    event_available_seats: i32,
    event_price: i64,
    user_name: String,
    user_email: String,
    user_role: String,
}

impl TryFrom<BookingDetailRow> for BookingDetail {
    type Error = error_stack::Report<KernelError>;
    fn try_from(row: BookingDetailRow) -> Result<Self, Self::Error> {
        let event = Event::new(
            EventId::new(row.event_id),
            EventTitle::new(row.event_title),
            EventDescription::new(row.event_description),
            EventStartsAt::new(row.event_starts_at),
            EventVenue::new(row.event_venue),
            TotalSeats::new(row.event_total_seats),
            AvailableSeats::new(row.event_available_seats),
            TicketPrice::new(row.event_price),
        );
        let user = User::new(
            UserId::new(row.user_id),
            UserName::new(row.user_name),
            UserEmail::new(row.user_email),
            UserRole::from_str(&row.user_role)?,
        );
        let booking = Booking::new(
            BookingId::new(row.id),
            EventId::new(row.event_id),
            UserId::new(row.user_id),
            SeatCount::new(row.seat_count),
            BookingAmount::new(row.amount),
            BookingStatus::from_str(&row.status)?,
            CreatedAt::new(row.created_at),
        );
        Ok(BookingDetail::new(booking, event, user))
    }
}

pub(in crate::database) struct PgBookingInternal;

impl PgBookingInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, event_id, user_id, seat_count, amount, status, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    #[tracing::instrument(skip_all, fields(booking_id = %id.as_ref()))]
    async fn find_by_id_for_update(
        con: &mut PgConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, event_id, user_id, seat_count, amount, status, created_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_details(
        con: &mut PgConnection,
        user_id: Option<&UserId>,
    ) -> error_stack::Result<Vec<BookingDetail>, KernelError> {
        let rows = sqlx::query_as::<_, BookingDetailRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.event_id, b.user_id, b.seat_count, b.amount, b.status, b.created_at,
                   e.title AS event_title, e.description AS event_description,
                   e.starts_at AS event_starts_at, e.venue AS event_venue,
                   e.total_seats AS event_total_seats, e.available_seats AS event_available_seats,
                   e.price AS event_price,
                   u.name AS user_name, u.email AS user_email, u.role AS user_role
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            JOIN users u ON u.id = b.user_id
            WHERE $1::uuid IS NULL OR b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id.map(|id| *id.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(BookingDetail::try_from).collect()
    }

    async fn count_by_event_id(
        con: &mut PgConnection,
        event_id: &EventId,
    ) -> error_stack::Result<i64, KernelError> {
        // language=postgresql
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(count)
    }

    #[tracing::instrument(skip_all, fields(booking_id = %booking.id().as_ref()))]
    async fn create(con: &mut PgConnection, booking: &Booking) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO bookings (id, event_id, user_id, seat_count, amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.event_id().as_ref())
        .bind(booking.user_id().as_ref())
        .bind(booking.seat_count().as_ref())
        .bind(booking.amount().as_ref())
        .bind(booking.status().as_str())
        .bind(booking.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(booking_id = %booking.id().as_ref(), status = %booking.status()))]
    async fn update_status(
        con: &mut PgConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
