use application::transfer::{
    ActorDto, CancelBookingDto, ConfirmBookingDto, CreateBookingDto, GetAllBookingDto,
    GetBookingDto, GetMyBookingDto,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    event_id: Uuid,
    seat_count: i32,
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

#[derive(Debug)]
pub struct ConfirmRequest {
    id: Uuid,
}

impl ConfirmRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CancelRequest {
    id: Uuid,
}

impl CancelRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetAllRequest;

#[derive(Debug)]
pub struct GetMineRequest;

pub struct Transformer;

impl Intake<(ActorDto, CreateRequest)> for Transformer {
    type To = CreateBookingDto;
    fn emit(&self, (actor, input): (ActorDto, CreateRequest)) -> Self::To {
        CreateBookingDto {
            actor,
            event_id: input.event_id,
            seat_count: input.seat_count,
        }
    }
}

impl Intake<(ActorDto, GetRequest)> for Transformer {
    type To = GetBookingDto;
    fn emit(&self, (actor, input): (ActorDto, GetRequest)) -> Self::To {
        GetBookingDto {
            actor,
            id: input.id,
        }
    }
}

impl Intake<(ActorDto, ConfirmRequest)> for Transformer {
    type To = ConfirmBookingDto;
    fn emit(&self, (actor, input): (ActorDto, ConfirmRequest)) -> Self::To {
        ConfirmBookingDto {
            actor,
            id: input.id,
        }
    }
}

impl Intake<(ActorDto, CancelRequest)> for Transformer {
    type To = CancelBookingDto;
    fn emit(&self, (actor, input): (ActorDto, CancelRequest)) -> Self::To {
        CancelBookingDto {
            actor,
            id: input.id,
        }
    }
}

impl Intake<(ActorDto, GetAllRequest)> for Transformer {
    type To = GetAllBookingDto;
    fn emit(&self, (actor, _): (ActorDto, GetAllRequest)) -> Self::To {
        GetAllBookingDto { actor }
    }
}

impl Intake<(ActorDto, GetMineRequest)> for Transformer {
    type To = GetMyBookingDto;
    fn emit(&self, (actor, _): (ActorDto, GetMineRequest)) -> Self::To {
        GetMyBookingDto { actor }
    }
}
