use application::transfer::EventDto;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    id: Uuid,
    title: String,
    description: String,
    #[serde(with = "time::serde::rfc3339")]
    starts_at: OffsetDateTime,
    venue: String,
    total_seats: i32,
    available_seats: i32,
    price: i64,
}

impl From<EventDto> for EventResponse {
    fn from(value: EventDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            starts_at: value.starts_at,
            venue: value.venue,
            total_seats: value.total_seats,
            available_seats: value.available_seats,
            price: value.price,
        }
    }
}

pub struct Presenter;

impl Exhaust<EventDto> for Presenter {
    type To = Json<EventResponse>;
    fn emit(&self, input: EventDto) -> Self::To {
        Json(EventResponse::from(input))
    }
}

impl Exhaust<Vec<EventDto>> for Presenter {
    type To = Json<Vec<EventResponse>>;
    fn emit(&self, input: Vec<EventDto>) -> Self::To {
        Json(input.into_iter().map(EventResponse::from).collect())
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
