mod amount;
mod detail;
mod id;
mod seat_count;
mod status;

pub use self::{amount::*, detail::*, id::*, seat_count::*, status::*};
use crate::entity::{CreatedAt, EventId, UserId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Booking {
    id: BookingId,
    event_id: EventId,
    user_id: UserId,
    seat_count: SeatCount,
    amount: BookingAmount,
    status: BookingStatus,
    created_at: CreatedAt<Booking>,
}

impl Booking {
    pub fn new(
        id: BookingId,
        event_id: EventId,
        user_id: UserId,
        seat_count: SeatCount,
        amount: BookingAmount,
        status: BookingStatus,
        created_at: CreatedAt<Booking>,
    ) -> Self {
        Self {
            id,
            event_id,
            user_id,
            seat_count,
            amount,
            status,
            created_at,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Confirmation does not look at the current status, so a cancelled
    /// booking can be confirmed again without getting its seats back.
    pub fn confirm(self) -> Self {
        self.reconstruct(|booking| booking.status = BookingStatus::Confirmed)
    }

    pub fn cancel(self) -> error_stack::Result<Self, KernelError> {
        if self.status == BookingStatus::Cancelled {
            return Err(Report::new(KernelError::AlreadyCancelled)
                .attach_printable(format!("Booking {} is already cancelled", self.id.as_ref())));
        }
        Ok(self.reconstruct(|booking| booking.status = BookingStatus::Cancelled))
    }
}
