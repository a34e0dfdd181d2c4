use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const PENDING: &str = "PENDING";
const CONFIRMED: &str = "CONFIRMED";
const CANCELLED: &str = "CANCELLED";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Pending and confirmed bookings hold seats.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => PENDING,
            BookingStatus::Confirmed => CONFIRMED,
            BookingStatus::Cancelled => CANCELLED,
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PENDING => Ok(BookingStatus::Pending),
            CONFIRMED => Ok(BookingStatus::Confirmed),
            CANCELLED => Ok(BookingStatus::Cancelled),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown booking status: {s}"))),
        }
    }
}
