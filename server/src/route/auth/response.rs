use application::transfer::{SessionDto, UserDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use kernel::prelude::entity::UserRole;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::session::TOKEN_COOKIE;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    id: Uuid,
    name: String,
    email: String,
    role: UserRole,
}

impl From<UserDto> for UserResponse {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    message: &'static str,
    token: String,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
    user: UserResponse,
}

impl IntoResponse for SignInResponse {
    fn into_response(self) -> Response {
        let cookie = Cookie::build((TOKEN_COOKIE, self.token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(self.expires_at);
        (CookieJar::new().add(cookie), Json(self)).into_response()
    }
}

pub struct SignedOut;

impl IntoResponse for SignedOut {
    fn into_response(self) -> Response {
        let jar = CookieJar::new().remove(Cookie::build(TOKEN_COOKIE).path("/"));
        (jar, StatusCode::NO_CONTENT).into_response()
    }
}

pub struct Presenter;

impl Exhaust<String> for Presenter {
    type To = Redirect;
    fn emit(&self, input: String) -> Self::To {
        Redirect::to(&input)
    }
}

impl Exhaust<SessionDto> for Presenter {
    type To = SignInResponse;
    fn emit(&self, input: SessionDto) -> Self::To {
        SignInResponse {
            message: "Login successful",
            token: input.token,
            expires_at: input.expires_at,
            user: UserResponse::from(input.user),
        }
    }
}

impl Exhaust<UserDto> for Presenter {
    type To = Json<UserResponse>;
    fn emit(&self, input: UserDto) -> Self::To {
        Json(UserResponse::from(input))
    }
}

impl Exhaust<()> for Presenter {
    type To = SignedOut;
    fn emit(&self, _: ()) -> Self::To {
        SignedOut
    }
}

#[cfg(test)]
mod test {
    use application::transfer::{SessionDto, UserDto};
    use axum::http::header::SET_COOKIE;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::prelude::entity::UserRole;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::controller::Exhaust;
    use crate::route::auth::response::Presenter;

    #[test]
    fn sign_in_sets_http_only_cookie() {
        let dto = SessionDto {
            token: "abc".to_string(),
            expires_at: datetime!(2030-01-01 00:00 UTC),
            user: UserDto {
                id: Uuid::new_v4(),
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                role: UserRole::User,
            },
        };
        let response = Presenter.emit(dto).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("token=abc"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn sign_out_clears_cookie() {
        let response = Presenter.emit(()).into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("token="));
    }
}
