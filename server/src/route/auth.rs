mod request;
mod response;

pub(crate) use self::response::UserResponse;

use application::service::{BeginSignInService, SessionService, SignInService};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::Router;

use crate::controller::Controller;
use crate::handler::AppModule;
use crate::route::auth::request::{CallbackRequest, SignOutRequest, Transformer};
use crate::route::auth::response::Presenter;
use crate::session::{Actor, BearerToken};

pub trait AuthRouter {
    fn route_auth(self) -> Self;
}

impl AuthRouter for Router<AppModule> {
    fn route_auth(self) -> Self {
        self.route(
            "/api/auth/google",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.begin_sign_in())
                    .await
            }),
        )
        .route(
            "/api/auth/google/callback",
            get(
                |State(module): State<AppModule>, Query(req): Query<CallbackRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.sign_in(dto).await })
                        .await
                },
            ),
        )
        .route(
            "/api/auth/me",
            get(
                |State(module): State<AppModule>, Actor(actor): Actor| async move {
                    Controller::new((), Presenter)
                        .bypass(|| module.get_current_user(actor))
                        .await
                },
            ),
        )
        .route(
            "/api/auth/logout",
            post(
                |State(module): State<AppModule>, BearerToken(token): BearerToken| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(SignOutRequest::new(token))
                        .handle(|dto| async move { module.sign_out(dto).await })
                        .await
                },
            ),
        )
    }
}
