use application::transfer::{
    ActorDto, CreateEventDto, DeleteEventDto, GetEventDto, UpdateEventDto,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(with = "time::serde::rfc3339")]
    starts_at: OffsetDateTime,
    venue: String,
    total_seats: i32,
    price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    title: Option<String>,
    description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    starts_at: Option<OffsetDateTime>,
    venue: Option<String>,
    total_seats: Option<i32>,
    price: Option<i64>,
}

#[derive(Debug)]
pub struct GetRequest {
    id: Uuid,
}

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<GetRequest> for Transformer {
    type To = GetEventDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetEventDto { id: input.id }
    }
}

impl Intake<(ActorDto, CreateRequest)> for Transformer {
    type To = CreateEventDto;
    fn emit(&self, (actor, input): (ActorDto, CreateRequest)) -> Self::To {
        CreateEventDto {
            actor,
            title: input.title,
            description: input.description,
            starts_at: input.starts_at,
            venue: input.venue,
            total_seats: input.total_seats,
            price: input.price,
        }
    }
}

impl Intake<(ActorDto, Uuid, UpdateRequest)> for Transformer {
    type To = UpdateEventDto;
    fn emit(&self, (actor, id, input): (ActorDto, Uuid, UpdateRequest)) -> Self::To {
        UpdateEventDto {
            actor,
            id,
            title: input.title,
            description: input.description,
            starts_at: input.starts_at,
            venue: input.venue,
            total_seats: input.total_seats,
            price: input.price,
        }
    }
}

impl Intake<(ActorDto, Uuid)> for Transformer {
    type To = DeleteEventDto;
    fn emit(&self, (actor, id): (ActorDto, Uuid)) -> Self::To {
        DeleteEventDto { actor, id }
    }
}

#[cfg(test)]
mod test {
    use application::transfer::ActorDto;
    use kernel::prelude::entity::UserRole;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::controller::Intake;
    use crate::route::event::request::{CreateRequest, Transformer, UpdateRequest};

    fn admin() -> ActorDto {
        ActorDto {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn create_body_is_camel_case() {
        let request: CreateRequest = serde_json::from_str(
            r#"{
                "title": "Live Concert",
                "startsAt": "2030-07-01T18:00:00Z",
                "venue": "Arena",
                "totalSeats": 100,
                "price": 1500
            }"#,
        )
        .unwrap();
        let dto = Transformer.emit((admin(), request));
        assert_eq!(dto.title, "Live Concert");
        assert_eq!(dto.description, "");
        assert_eq!(dto.starts_at, datetime!(2030-07-01 18:00 UTC));
        assert_eq!(dto.total_seats, 100);
        assert_eq!(dto.price, 1500);
    }

    #[test]
    fn update_body_is_partial() {
        let request: UpdateRequest = serde_json::from_str(r#"{ "price": 2500 }"#).unwrap();
        let id = Uuid::new_v4();
        let dto = Transformer.emit((admin(), id, request));
        assert_eq!(dto.id, id);
        assert_eq!(dto.price, Some(2500));
        assert!(dto.title.is_none());
        assert!(dto.starts_at.is_none());
        assert!(dto.total_seats.is_none());
    }
}
