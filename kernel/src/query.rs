mod booking;
mod event;
mod user;

pub use self::{booking::*, event::*, user::*};
