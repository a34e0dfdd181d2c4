use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{BookingAmount, SeatCount};
use crate::KernelError;

/// Unit cost of one seat, in minor currency units.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TicketPrice(i64);

impl TicketPrice {
    pub fn new(price: impl Into<i64>) -> Self {
        Self(price.into())
    }

    pub fn total_for(&self, seats: &SeatCount) -> error_stack::Result<BookingAmount, KernelError> {
        let seats = i64::from(*seats.as_ref());
        self.0
            .checked_mul(seats)
            .map(BookingAmount::new)
            .ok_or_else(|| {
                Report::new(KernelError::InvalidInput)
                    .attach_printable(format!("Amount overflow: {} x {seats}", self.0))
            })
    }
}
