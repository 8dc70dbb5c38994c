use std::time::{Duration, Instant};

use uuid::Uuid;

use userbook_infra::StoreContext;

/// Header carrying the correlation id, inbound and outbound.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-request context, created by the request-id stage.
///
/// Lives in request extensions for exactly one request and is passed on by
/// value to the access-log stage and the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
    started_at: Instant,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started_at: Instant::now(),
        }
    }

    /// Context with a fresh random (UUID v4) correlation id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Store-call context bounded to `timeout` after the request started.
    pub fn store_context(&self, timeout: Duration) -> StoreContext {
        StoreContext::new(self.request_id.clone(), self.started_at.checked_add(timeout))
    }
}
