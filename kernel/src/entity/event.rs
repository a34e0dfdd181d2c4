mod description;
mod id;
mod price;
mod seats;
mod starts_at;
mod title;
mod venue;

pub use self::{description::*, id::*, price::*, seats::*, starts_at::*, title::*, venue::*};
use crate::entity::SeatCount;
use crate::KernelError;
use destructure::{Destructure, Mutation};
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Event {
    id: EventId,
    title: EventTitle,
    description: EventDescription,
    starts_at: EventStartsAt,
    venue: EventVenue,
    total_seats: TotalSeats,
    available_seats: AvailableSeats,
    price: TicketPrice,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        title: EventTitle,
        description: EventDescription,
        starts_at: EventStartsAt,
        venue: EventVenue,
        total_seats: TotalSeats,
        available_seats: AvailableSeats,
        price: TicketPrice,
    ) -> Self {
        Self {
            id,
            title,
            description,
            starts_at,
            venue,
            total_seats,
            available_seats,
            price,
        }
    }

    /// Seats held by active bookings.
    pub fn reserved_seats(&self) -> i32 {
        self.total_seats.as_ref() - self.available_seats.as_ref()
    }

    /// Takes `seats` out of the remaining capacity.
    pub fn reserve(self, seats: &SeatCount) -> error_stack::Result<Self, KernelError> {
        let requested = *seats.as_ref();
        let available = *self.available_seats.as_ref();
        if requested <= 0 {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("Seat count must be positive, got {requested}")));
        }
        if available < requested {
            return Err(Report::new(KernelError::InsufficientInventory).attach_printable(
                format!("Requested {requested} seats but only {available} available"),
            ));
        }
        Ok(self.reconstruct(|event| {
            event.available_seats = AvailableSeats::new(available - requested);
        }))
    }

    /// Gives `seats` back to the remaining capacity.
    pub fn release(self, seats: &SeatCount) -> error_stack::Result<Self, KernelError> {
        let released = *seats.as_ref();
        let available = *self.available_seats.as_ref();
        let total = *self.total_seats.as_ref();
        match available.checked_add(released) {
            Some(next) if released > 0 && next <= total => Ok(self.reconstruct(|event| {
                event.available_seats = AvailableSeats::new(next);
            })),
            _ => Err(Report::new(KernelError::Internal).attach_printable(format!(
                "Releasing {released} seats would leave {available} + {released} of {total} available"
            ))),
        }
    }

    /// Changes the capacity while keeping every reserved seat reserved.
    pub fn resize(self, total_seats: TotalSeats) -> error_stack::Result<Self, KernelError> {
        let next_total = *total_seats.as_ref();
        let reserved = self.reserved_seats();
        if next_total <= 0 || next_total < reserved {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Capacity {next_total} cannot hold {reserved} reserved seats"
            )));
        }
        Ok(self.reconstruct(|event| {
            event.total_seats = total_seats;
            event.available_seats = AvailableSeats::new(next_total - reserved);
        }))
    }
}
