mod booking;
mod common;
mod event;
mod identity;
mod session;
mod user;

pub use self::{booking::*, common::*, event::*, identity::*, session::*, user::*};
