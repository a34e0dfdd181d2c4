mod request;
mod response;

use application::service::{
    CancelBookingService, ConfirmBookingService, CreateBookingService, GetBookingService,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

use crate::controller::Controller;
use crate::handler::AppModule;
use crate::route::booking::request::{
    CancelRequest, ConfirmRequest, CreateRequest, GetAllRequest, GetMineRequest, GetRequest,
    Transformer,
};
use crate::route::booking::response::{ListPresenter, Presenter};
use crate::session::Actor;

pub trait BookingRouter {
    fn route_booking(self) -> Self;
}

impl BookingRouter for Router<AppModule> {
    fn route_booking(self) -> Self {
        self.route(
            "/api/bookings",
            get(
                |State(module): State<AppModule>, Actor(actor): Actor| async move {
                    Controller::new(Transformer, ListPresenter)
                        .intake((actor, GetAllRequest))
                        .handle(|dto| async move { module.get_all_bookings(dto).await })
                        .await
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter("Booking created successfully"))
                        .intake((actor, req))
                        .handle(|dto| async move { module.create_booking(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                },
            ),
        )
        .route(
            "/api/bookings/me",
            get(
                |State(module): State<AppModule>, Actor(actor): Actor| async move {
                    Controller::new(Transformer, ListPresenter)
                        .intake((actor, GetMineRequest))
                        .handle(|dto| async move { module.get_my_bookings(dto).await })
                        .await
                },
            ),
        )
        .route(
            "/api/bookings/:id",
            get(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter("Booking found"))
                        .intake((actor, GetRequest::new(id)))
                        .handle(|dto| async move { module.get_booking(dto).await })
                        .await
                },
            ),
        )
        .route(
            "/api/bookings/:id/confirm",
            patch(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter("Booking confirmed"))
                        .intake((actor, ConfirmRequest::new(id)))
                        .handle(|dto| async move { module.confirm_booking(dto).await })
                        .await
                },
            ),
        )
        .route(
            "/api/bookings/:id/cancel",
            patch(
                |State(module): State<AppModule>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter("Booking cancelled"))
                        .intake((actor, CancelRequest::new(id)))
                        .handle(|dto| async move { module.cancel_booking(dto).await })
                        .await
                },
            ),
        )
    }
}
