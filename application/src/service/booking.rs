use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookingQuery, DependOnBookingQuery, DependOnEventQuery, EventQuery};
use kernel::interface::update::{
    BookingModifier, DependOnBookingModifier, DependOnEventModifier, EventModifier,
};
use kernel::prelude::entity::{
    Booking, BookingId, BookingStatus, CreatedAt, EventId, SeatCount,
};
use kernel::KernelError;
use uuid::Uuid;

use crate::transfer::{
    BookingDetailDto, BookingDto, CancelBookingDto, ConfirmBookingDto, CreateBookingDto,
    GetAllBookingDto, GetBookingDto, GetMyBookingDto,
};

fn booking_not_found(id: &Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("Booking {id} not found"))
}

#[async_trait::async_trait]
pub trait GetBookingService:
    'static + Sync + Send + DependOnBookingQuery
{
    async fn get_booking(&self, dto: GetBookingDto) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let booking = self
            .booking_query()
            .find_by_id(&mut connection, &BookingId::new(dto.id))
            .await?
            .ok_or_else(|| booking_not_found(&dto.id))?;
        dto.actor.ensure_can_access(&booking)?;

        Ok(BookingDto::from(booking))
    }

    async fn get_all_bookings(
        &self,
        dto: GetAllBookingDto,
    ) -> error_stack::Result<Vec<BookingDetailDto>, KernelError> {
        dto.actor.ensure_admin()?;
        let mut connection = self.database_connection().transact().await?;

        let details = self.booking_query().find_all_details(&mut connection).await?;

        Ok(details.into_iter().map(BookingDetailDto::from).collect())
    }

    async fn get_my_bookings(
        &self,
        dto: GetMyBookingDto,
    ) -> error_stack::Result<Vec<BookingDetailDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let details = self
            .booking_query()
            .find_details_by_user_id(&mut connection, &dto.actor.user_id())
            .await?;

        Ok(details.into_iter().map(BookingDetailDto::from).collect())
    }
}

impl<T> GetBookingService for T where T: DependOnBookingQuery {}

/// Reserves seats and records the pending booking in one transaction.
///
/// The event row is read with a row lock, so concurrent requests for the same
/// event are applied one after another and `available_seats` never drops
/// below zero. Any error before `commit` drops the transaction, which undoes
/// the seat decrement together with the booking insert.
#[async_trait::async_trait]
pub trait CreateBookingService:
    'static + Sync + Send + DependOnEventQuery + DependOnEventModifier + DependOnBookingModifier
{
    async fn create_booking(
        &self,
        dto: CreateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        if dto.seat_count <= 0 {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("Seat count must be positive, got {}", dto.seat_count)));
        }
        let mut connection = self.database_connection().transact().await?;

        let event_id = EventId::new(dto.event_id);
        let seat_count = SeatCount::new(dto.seat_count);
        let event = self
            .event_query()
            .find_by_id_for_update(&mut connection, &event_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("Event {} not found", dto.event_id))
            })?;

        let amount = event.price().total_for(&seat_count)?;
        let event = event.reserve(&seat_count)?;
        self.event_modifier()
            .update(&mut connection, &event)
            .await?;

        let booking = Booking::new(
            BookingId::new(Uuid::new_v4()),
            event_id,
            dto.actor.user_id(),
            seat_count,
            amount,
            BookingStatus::Pending,
            CreatedAt::now(),
        );
        self.booking_modifier()
            .create(&mut connection, &booking)
            .await?;

        connection.commit().await?;

        tracing::info!(
            booking_id = %booking.id().as_ref(),
            event_id = %dto.event_id,
            seats = dto.seat_count,
            remaining = event.available_seats().as_ref(),
            "Booking created"
        );
        Ok(BookingDto::from(booking))
    }
}

impl<T> CreateBookingService for T where
    T: DependOnEventQuery + DependOnEventModifier + DependOnBookingModifier
{
}

#[async_trait::async_trait]
pub trait ConfirmBookingService:
    'static + Sync + Send + DependOnBookingQuery + DependOnBookingModifier
{
    async fn confirm_booking(
        &self,
        dto: ConfirmBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let booking = self
            .booking_query()
            .find_by_id_for_update(&mut connection, &BookingId::new(dto.id))
            .await?
            .ok_or_else(|| booking_not_found(&dto.id))?;
        dto.actor.ensure_can_access(&booking)?;

        let previous = *booking.status();
        let booking = booking.confirm();
        self.booking_modifier()
            .update_status(&mut connection, &booking)
            .await?;

        connection.commit().await?;

        if previous == BookingStatus::Cancelled {
            tracing::warn!(booking_id = %dto.id, "Cancelled booking confirmed");
        } else {
            tracing::info!(booking_id = %dto.id, "Booking confirmed");
        }
        Ok(BookingDto::from(booking))
    }
}

impl<T> ConfirmBookingService for T where T: DependOnBookingQuery + DependOnBookingModifier {}

/// Cancels a booking and returns its seats to the event in one transaction.
#[async_trait::async_trait]
pub trait CancelBookingService:
    'static
    + Sync
    + Send
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnEventQuery
    + DependOnEventModifier
{
    async fn cancel_booking(
        &self,
        dto: CancelBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let booking = self
            .booking_query()
            .find_by_id_for_update(&mut connection, &BookingId::new(dto.id))
            .await?
            .ok_or_else(|| booking_not_found(&dto.id))?;
        dto.actor.ensure_can_access(&booking)?;

        let booking = booking.cancel()?;
        let event = self
            .event_query()
            .find_by_id_for_update(&mut connection, booking.event_id())
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    booking_id = %dto.id,
                    event_id = %booking.event_id().as_ref(),
                    "Booking to cancel refers to a missing event"
                );
                Report::new(KernelError::Internal).attach_printable(format!(
                    "Event {} of booking {} is missing",
                    booking.event_id().as_ref(),
                    dto.id
                ))
            })?;

        let event = event.release(booking.seat_count())?;
        self.event_modifier()
            .update(&mut connection, &event)
            .await?;
        self.booking_modifier()
            .update_status(&mut connection, &booking)
            .await?;

        connection.commit().await?;

        tracing::info!(
            booking_id = %dto.id,
            seats = booking.seat_count().as_ref(),
            remaining = event.available_seats().as_ref(),
            "Booking cancelled"
        );
        Ok(BookingDto::from(booking))
    }
}

impl<T> CancelBookingService for T where
    T: DependOnBookingQuery + DependOnBookingModifier + DependOnEventQuery + DependOnEventModifier
{
}
