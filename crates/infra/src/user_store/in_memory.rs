use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use userbook_core::{User, UserDraft, UserId};

use super::context::StoreContext;
use super::r#trait::{StoreError, StoreResult, UserStore};

/// In-memory user store for tests/dev.
///
/// Ids start at 1 and only ever grow, so a deleted id is never handed out
/// again.
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<UserId, User>,
    last_id: i64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("in-memory store lock poisoned".to_string())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, ctx: &StoreContext, draft: &UserDraft) -> StoreResult<User> {
        ctx.check("create")?;
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;
        inner.last_id += 1;
        let user = draft.clone().into_user(UserId::new(inner.last_id));
        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, ctx: &StoreContext, id: UserId) -> StoreResult<User> {
        ctx.check("get_by_id")?;
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        inner.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, ctx: &StoreContext, id: UserId, draft: &UserDraft) -> StoreResult<User> {
        ctx.check("update")?;
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        *row = draft.clone().into_user(id);
        Ok(row.clone())
    }

    async fn delete(&self, ctx: &StoreContext, id: UserId) -> StoreResult<()> {
        ctx.check("delete")?;
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;
        inner.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list(&self, ctx: &StoreContext) -> StoreResult<Vec<User>> {
        ctx.check("list")?;
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(inner.rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Instant;

    fn ctx() -> StoreContext {
        StoreContext::unbounded("test")
    }

    fn draft(name: &str, y: i32, m: u32, d: u32) -> UserDraft {
        UserDraft::new(name, NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let store = InMemoryUserStore::new();
        let created = store.create(&ctx(), &draft("Ada", 2000, 6, 15)).await.unwrap();
        assert_eq!(created.id, UserId::new(1));

        let fetched = store.get_by_id(&ctx(), created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = InMemoryUserStore::new();
        let id = UserId::new(99);
        assert!(store.get_by_id(&ctx(), id).await.unwrap_err().is_not_found());
        assert!(
            store
                .update(&ctx(), id, &draft("X", 2000, 1, 1))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.delete(&ctx(), id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let store = InMemoryUserStore::new();
        let created = store.create(&ctx(), &draft("Ada", 2000, 6, 15)).await.unwrap();

        let updated = store
            .update(&ctx(), created.id, &draft("Ada L.", 1999, 12, 10))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(store.get_by_id(&ctx(), created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = InMemoryUserStore::new();
        let first = store.create(&ctx(), &draft("A", 2000, 1, 1)).await.unwrap();
        store.delete(&ctx(), first.id).await.unwrap();
        let second = store.create(&ctx(), &draft("B", 2000, 1, 1)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(store.get_by_id(&ctx(), first.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id_and_empty_when_new() {
        let store = InMemoryUserStore::new();
        assert!(store.list(&ctx()).await.unwrap().is_empty());

        for name in ["c", "a", "b"] {
            store.create(&ctx(), &draft(name, 2000, 1, 1)).await.unwrap();
        }
        let ids: Vec<i64> = store.list(&ctx()).await.unwrap().iter().map(|u| u.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn expired_context_fails_without_side_effects() {
        let store = InMemoryUserStore::new();
        let expired = StoreContext::new("late", Some(Instant::now()));

        let err = store.create(&expired, &draft("A", 2000, 1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DeadlineExceeded("create")));
        assert!(store.list(&ctx()).await.unwrap().is_empty());
    }
}
