use kernel::prelude::entity::{DestructUser, Session, User, UserRole};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            name,
            email,
            role,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionDto {
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub user: UserDto,
}

impl SessionDto {
    pub(crate) fn new(session: Session, user: User) -> Self {
        Self {
            token: session.token().as_ref().clone(),
            expires_at: *session.expires_at(),
            user: UserDto::from(user),
        }
    }
}

pub struct SignInDto {
    pub code: String,
    pub state: String,
}

pub struct SessionTokenDto {
    pub token: String,
}
