use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Fixed capacity of an event.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalSeats(i32);

impl TotalSeats {
    pub fn new(seats: impl Into<i32>) -> Self {
        Self(seats.into())
    }
}

/// Remaining capacity of an event. Always within `0..=TotalSeats`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct AvailableSeats(i32);

impl AvailableSeats {
    pub fn new(seats: impl Into<i32>) -> Self {
        Self(seats.into())
    }
}

impl From<TotalSeats> for AvailableSeats {
    fn from(value: TotalSeats) -> Self {
        Self(value.0)
    }
}
