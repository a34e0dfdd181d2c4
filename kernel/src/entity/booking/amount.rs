use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Price paid for a booking, fixed when the booking is created.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookingAmount(i64);

impl BookingAmount {
    pub fn new(amount: impl Into<i64>) -> Self {
        Self(amount.into())
    }
}
