use kernel::prelude::entity::{
    Booking, BookingDetail, BookingStatus, DestructBooking, DestructBookingDetail,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::{ActorDto, EventDto, UserDto};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookingDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub seat_count: i32,
    pub amount: i64,
    pub status: BookingStatus,
    pub created_at: OffsetDateTime,
}

impl From<Booking> for BookingDto {
    fn from(value: Booking) -> Self {
        let DestructBooking {
            id,
            event_id,
            user_id,
            seat_count,
            amount,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            event_id: event_id.into(),
            user_id: user_id.into(),
            seat_count: seat_count.into(),
            amount: amount.into(),
            status,
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingDetailDto {
    pub booking: BookingDto,
    pub event: EventDto,
    pub user: UserDto,
}

impl From<BookingDetail> for BookingDetailDto {
    fn from(value: BookingDetail) -> Self {
        let DestructBookingDetail {
            booking,
            event,
            user,
        } = value.into_destruct();
        Self {
            booking: booking.into(),
            event: event.into(),
            user: user.into(),
        }
    }
}

pub struct CreateBookingDto {
    pub actor: ActorDto,
    pub event_id: Uuid,
    pub seat_count: i32,
}

pub struct GetBookingDto {
    pub actor: ActorDto,
    pub id: Uuid,
}

pub struct GetAllBookingDto {
    pub actor: ActorDto,
}

pub struct GetMyBookingDto {
    pub actor: ActorDto,
}

pub struct ConfirmBookingDto {
    pub actor: ActorDto,
    pub id: Uuid,
}

pub struct CancelBookingDto {
    pub actor: ActorDto,
    pub id: Uuid,
}
