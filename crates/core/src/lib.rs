//! `userbook-core`: user domain building blocks.
//!
//! This crate contains **pure domain** logic (no infrastructure concerns):
//! identifiers, the validated user draft, and the age calculator.

pub mod age;
pub mod clock;
pub mod error;
pub mod id;
pub mod user;

pub use age::age_on;
pub use clock::{Clock, DefaultClock, today};
pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use user::{DOB_FORMAT, User, UserDraft};
