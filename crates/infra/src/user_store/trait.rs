use async_trait::async_trait;
use thiserror::Error;

use userbook_core::{User, UserDraft, UserId};

use super::context::StoreContext;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// Callers are expected to distinguish only [`StoreError::NotFound`] from
/// everything else; the other variants exist for logging.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("deadline exceeded during {0}")]
    DeadlineExceeded(&'static str),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Persistence capability for users.
///
/// ## Semantics
///
/// - `create` assigns a fresh id; ids are never reused, even after delete.
/// - `get_by_id`, `update` and `delete` fail with `NotFound` when no row
///   matches the id.
/// - `update` replaces `name` and `date_of_birth` in place; `id` is untouched.
/// - `list` returns every user ordered by id (empty store → empty vec).
///
/// Every call takes the request's [`StoreContext`]; implementations must give
/// up with `DeadlineExceeded` once its deadline has passed. No operation
/// retries.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, ctx: &StoreContext, draft: &UserDraft) -> StoreResult<User>;

    async fn get_by_id(&self, ctx: &StoreContext, id: UserId) -> StoreResult<User>;

    async fn update(&self, ctx: &StoreContext, id: UserId, draft: &UserDraft) -> StoreResult<User>;

    async fn delete(&self, ctx: &StoreContext, id: UserId) -> StoreResult<()>;

    async fn list(&self, ctx: &StoreContext) -> StoreResult<Vec<User>>;
}
