mod request;
mod response;

pub(crate) use self::response::EventResponse;

use application::service::{
    CreateEventService, DeleteEventService, GetEventService, UpdateEventService,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::controller::Controller;
use crate::handler::AppModule;
use crate::route::event::request::{CreateRequest, GetRequest, Transformer, UpdateRequest};
use crate::route::event::response::Presenter;
use crate::session::Actor;

pub trait EventRouter {
    fn route_event(self) -> Self;
}

impl EventRouter for Router<AppModule> {
    fn route_event(self) -> Self {
        self.route(
            "/api/events",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.get_all_events())
                    .await
            })
            .post(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((actor, req))
                        .handle(|dto| async move { module.create_event(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                },
            ),
        )
        .route(
            "/api/events/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_event(dto).await })
                        .await
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((actor, id, req))
                        .handle(|dto| async move { module.update_event(dto).await })
                        .await
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((actor, id))
                        .handle(|dto| async move { module.delete_event(dto).await })
                        .await
                },
            ),
        )
    }
}
