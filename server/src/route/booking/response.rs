use application::transfer::{BookingDetailDto, BookingDto};
use axum::Json;
use kernel::prelude::entity::BookingStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::route::auth::UserResponse;
use crate::route::event::EventResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    seat_count: i32,
    amount: i64,
    status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<BookingDto> for BookingResponse {
    fn from(value: BookingDto) -> Self {
        Self {
            id: value.id,
            event_id: value.event_id,
            user_id: value.user_id,
            seat_count: value.seat_count,
            amount: value.amount,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    booking: BookingResponse,
    event: EventResponse,
    user: UserResponse,
}

impl From<BookingDetailDto> for BookingDetailResponse {
    fn from(value: BookingDetailDto) -> Self {
        Self {
            booking: BookingResponse::from(value.booking),
            event: EventResponse::from(value.event),
            user: UserResponse::from(value.user),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    message: String,
    booking: BookingResponse,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    bookings: Vec<BookingDetailResponse>,
}

/// Wraps a single booking with a human readable `message`.
pub struct Presenter(pub &'static str);

impl Exhaust<BookingDto> for Presenter {
    type To = Json<BookingEnvelope>;
    fn emit(&self, input: BookingDto) -> Self::To {
        Json(BookingEnvelope {
            message: self.0.to_string(),
            booking: BookingResponse::from(input),
        })
    }
}

pub struct ListPresenter;

impl Exhaust<Vec<BookingDetailDto>> for ListPresenter {
    type To = Json<BookingListResponse>;
    fn emit(&self, input: Vec<BookingDetailDto>) -> Self::To {
        Json(BookingListResponse {
            bookings: input.into_iter().map(BookingDetailResponse::from).collect(),
        })
    }
}
