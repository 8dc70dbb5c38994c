//! Infrastructure layer: user persistence and database bootstrap.

pub mod db;
pub mod user_store;

pub use user_store::{
    InMemoryUserStore, PostgresUserStore, StoreContext, StoreError, StoreResult, UserStore,
};
