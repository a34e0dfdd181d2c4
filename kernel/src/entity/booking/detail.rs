use destructure::Destructure;
use vodca::References;

use crate::entity::{Booking, Event, User};

/// A booking joined with the event it holds seats for and the user who made it.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookingDetail {
    booking: Booking,
    event: Event,
    user: User,
}

impl BookingDetail {
    pub fn new(booking: Booking, event: Event, user: User) -> Self {
        Self {
            booking,
            event,
            user,
        }
    }
}
