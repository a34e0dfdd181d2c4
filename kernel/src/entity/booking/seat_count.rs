use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct SeatCount(i32);

impl SeatCount {
    pub fn new(count: impl Into<i32>) -> Self {
        Self(count.into())
    }
}
