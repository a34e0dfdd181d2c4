mod auth;
mod booking;
mod event;

pub use self::{auth::AuthRouter, booking::BookingRouter, event::EventRouter};
