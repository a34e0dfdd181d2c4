pub use crate::error::*;

mod database;
mod entity;
mod error;
mod identity;
mod modify;
mod query;
mod session;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod session {
        pub use crate::session::*;
    }
    pub mod identity {
        pub use crate::identity::*;
    }
}
