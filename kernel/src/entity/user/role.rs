use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const USER: &str = "USER";
const ADMIN: &str = "ADMIN";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => USER,
            UserRole::Admin => ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            USER => Ok(UserRole::User),
            ADMIN => Ok(UserRole::Admin),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown user role: {s}"))),
        }
    }
}
