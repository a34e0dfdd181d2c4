mod auth;
mod booking;
mod event;

pub use self::{auth::*, booking::*, event::*};
