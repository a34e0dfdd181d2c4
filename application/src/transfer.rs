mod actor;
mod booking;
mod event;
mod user;

pub use self::{actor::*, booking::*, event::*, user::*};
