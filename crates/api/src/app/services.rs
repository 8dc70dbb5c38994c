use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use userbook_core::{Clock, clock};
use userbook_infra::{StoreContext, UserStore};

use crate::context::RequestContext;

/// Capabilities shared by all handlers.
///
/// Cloned cheaply behind an `Arc`; nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            request_timeout,
        }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        clock::today(self.clock.as_ref())
    }

    /// Store context for this request, bounded by the configured timeout.
    pub fn store_context(&self, ctx: &RequestContext) -> StoreContext {
        ctx.store_context(self.request_timeout)
    }
}
