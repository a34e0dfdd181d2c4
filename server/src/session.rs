use application::service::SessionService;
use application::transfer::{ActorDto, SessionTokenDto};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::Report;
use kernel::KernelError;

use crate::error::ErrorStatus;
use crate::handler::AppModule;

pub const TOKEN_COOKIE: &str = "token";

/// Session token from the `token` cookie, or else from `Authorization: Bearer …`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(TOKEN_COOKIE) {
            return Ok(Self(cookie.value().to_string()));
        }
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map(|TypedHeader(Authorization(bearer))| Self(bearer.token().to_string()))
            .map_err(|_| {
                ErrorStatus::from(
                    Report::new(KernelError::Unauthorized)
                        .attach_printable("No session token in request"),
                )
            })
    }
}

/// The signed in caller.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorDto);

#[axum::async_trait]
impl FromRequestParts<AppModule> for Actor {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        module: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, module).await?;
        module
            .resolve_session(SessionTokenDto { token })
            .await
            .map(Self)
            .map_err(ErrorStatus::from)
    }
}
