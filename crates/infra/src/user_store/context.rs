use std::future::Future;
use std::time::Instant;

use super::r#trait::{StoreError, StoreResult};

/// Request-scoped context handed to every store call.
///
/// Carries the correlation id (for store-side logging) and the instant after
/// which in-flight work must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    request_id: String,
    deadline: Option<Instant>,
}

impl StoreContext {
    pub fn new(request_id: impl Into<String>, deadline: Option<Instant>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline,
        }
    }

    /// Context with no deadline (startup tasks, tests).
    pub fn unbounded(request_id: impl Into<String>) -> Self {
        Self::new(request_id, None)
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail fast if the deadline has already passed.
    pub fn check(&self, operation: &'static str) -> StoreResult<()> {
        if self.is_expired() {
            return Err(StoreError::DeadlineExceeded(operation));
        }
        Ok(())
    }

    /// Run `fut`, abandoning it when the deadline elapses.
    pub async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        self.check(operation)?;
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline.into(), fut)
                .await
                .map_err(|_| StoreError::DeadlineExceeded(operation))?,
            None => fut.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unbounded_context_never_expires() {
        let ctx = StoreContext::unbounded("r1");
        assert!(!ctx.is_expired());
        assert!(ctx.check("list").is_ok());
        assert_eq!(ctx.request_id(), "r1");
    }

    #[test]
    fn past_deadline_is_expired() {
        let ctx = StoreContext::new("r2", Some(Instant::now()));
        assert!(ctx.is_expired());
        assert!(matches!(ctx.check("create"), Err(StoreError::DeadlineExceeded("create"))));
    }

    #[tokio::test]
    async fn bounded_abandons_slow_work() {
        let ctx = StoreContext::new("r3", Some(Instant::now() + Duration::from_millis(20)));
        let res: StoreResult<()> = ctx
            .bounded("get_by_id", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(StoreError::DeadlineExceeded("get_by_id"))));
    }

    #[tokio::test]
    async fn bounded_passes_through_fast_work() {
        let ctx = StoreContext::new("r4", Some(Instant::now() + Duration::from_secs(5)));
        let res = ctx.bounded("list", async { Ok(7) }).await;
        assert_eq!(res.unwrap(), 7);
    }
}
