use error_stack::Report;
use kernel::prelude::entity::{Booking, Session, UserId, UserRole};
use kernel::KernelError;
use uuid::Uuid;

/// Identity of the caller, already verified by the session layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ActorDto {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl ActorDto {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user_id)
    }

    pub(crate) fn ensure_admin(&self) -> error_stack::Result<(), KernelError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("User {} is not an admin", self.user_id)))
        }
    }

    pub(crate) fn ensure_can_access(&self, booking: &Booking) -> error_stack::Result<(), KernelError> {
        if self.role.is_admin() || booking.is_owned_by(&self.user_id()) {
            Ok(())
        } else {
            Err(Report::new(KernelError::Forbidden).attach_printable(format!(
                "User {} does not own booking {}",
                self.user_id,
                booking.id().as_ref()
            )))
        }
    }
}

impl From<&Session> for ActorDto {
    fn from(session: &Session) -> Self {
        Self {
            user_id: *session.user_id().as_ref(),
            role: *session.role(),
        }
    }
}
