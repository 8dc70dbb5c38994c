//! User persistence boundary.
//!
//! Handlers only see [`UserStore`]; production wires [`PostgresUserStore`],
//! tests and local runs wire [`InMemoryUserStore`].

pub mod context;
pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use context::StoreContext;
pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;
pub use r#trait::{StoreError, StoreResult, UserStore};
