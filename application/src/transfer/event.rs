use kernel::prelude::entity::{DestructEvent, Event};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::ActorDto;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EventDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: OffsetDateTime,
    pub venue: String,
    pub total_seats: i32,
    pub available_seats: i32,
    pub price: i64,
}

impl From<Event> for EventDto {
    fn from(value: Event) -> Self {
        let DestructEvent {
            id,
            title,
            description,
            starts_at,
            venue,
            total_seats,
            available_seats,
            price,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            starts_at: starts_at.into(),
            venue: venue.into(),
            total_seats: total_seats.into(),
            available_seats: available_seats.into(),
            price: price.into(),
        }
    }
}

pub struct GetEventDto {
    pub id: Uuid,
}

pub struct CreateEventDto {
    pub actor: ActorDto,
    pub title: String,
    pub description: String,
    pub starts_at: OffsetDateTime,
    pub venue: String,
    pub total_seats: i32,
    pub price: i64,
}

pub struct UpdateEventDto {
    pub actor: ActorDto,
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<OffsetDateTime>,
    pub venue: Option<String>,
    pub total_seats: Option<i32>,
    pub price: Option<i64>,
}

pub struct DeleteEventDto {
    pub actor: ActorDto,
    pub id: Uuid,
}
