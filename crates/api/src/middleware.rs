//! Request pipeline stages wrapped around every route.
//!
//! Order (outermost first): request id → access log → route dispatch.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use userbook_observability::{AccessLogSink, AccessRecord};

use crate::app::errors;
use crate::context::{RequestContext, X_REQUEST_ID};

/// Correlation-id stage.
///
/// Propagates a non-empty inbound `X-Request-Id` unchanged, otherwise mints a
/// UUID v4. The id goes into request extensions as a [`RequestContext`] and
/// back out on the response header. Never fails the request.
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let ctx = match inbound_request_id(req.headers()) {
        Some(id) => RequestContext::new(id),
        None => RequestContext::generate(),
    };
    let request_id = ctx.request_id().to_string();
    req.extensions_mut().insert(ctx);

    let mut res = next.run(req).await;

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            res.headers_mut().insert(X_REQUEST_ID, value);
        }
        Err(error) => {
            tracing::error!(%error, request_id = %request_id, "failed to encode request id header");
        }
    }
    res
}

fn inbound_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct AccessLogState {
    pub sink: Arc<dyn AccessLogSink>,
}

impl AccessLogState {
    pub fn new(sink: Arc<dyn AccessLogSink>) -> Self {
        Self { sink }
    }
}

/// Access-log stage: one record per request, whatever the outcome.
///
/// Requires the [`RequestContext`] set by [`request_id_middleware`]; without
/// it the request is answered with 500 and nothing downstream runs.
pub async fn access_log_middleware(
    State(state): State<AccessLogState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(ctx) = req.extensions().get::<RequestContext>().cloned() else {
        tracing::error!(
            method = %req.method(),
            path = %req.uri().path(),
            "request context missing; request id stage must run before access log"
        );
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal server error",
        );
    };

    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let res = next.run(req).await;

    state.sink.record(AccessRecord {
        method,
        path,
        status: res.status().as_u16(),
        latency: ctx.elapsed(),
        request_id: ctx.request_id().to_string(),
    });
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use tower::{ServiceBuilder, ServiceExt};
    use userbook_observability::MemoryAccessLog;

    fn app_with(sink: Arc<MemoryAccessLog>, with_request_id: bool) -> Router {
        let access =
            axum::middleware::from_fn_with_state(AccessLogState::new(sink), access_log_middleware);
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        if with_request_id {
            router.layer(
                ServiceBuilder::new()
                    .layer(axum::middleware::from_fn(request_id_middleware))
                    .layer(access),
            )
        } else {
            router.layer(access)
        }
    }

    fn get_request(uri: &str, request_id: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn echoes_inbound_request_id_and_logs_it() {
        let sink = Arc::new(MemoryAccessLog::new());
        let res = app_with(sink.clone(), true)
            .oneshot(get_request("/ping", Some("r1")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[X_REQUEST_ID], "r1");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].request_id, "r1");
        assert_eq!(records[0].method, "GET");
        assert_eq!(records[0].path, "/ping");
        assert_eq!(records[0].status, 200);
    }

    #[tokio::test]
    async fn empty_inbound_id_is_replaced() {
        let sink = Arc::new(MemoryAccessLog::new());
        let res = app_with(sink.clone(), true)
            .oneshot(get_request("/ping", Some("")))
            .await
            .unwrap();

        let id = res.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(sink.records()[0].request_id, id);
    }

    #[tokio::test]
    async fn non_text_inbound_id_is_replaced() {
        let sink = Arc::new(MemoryAccessLog::new());
        let req = Request::builder()
            .uri("/ping")
            .header(X_REQUEST_ID, HeaderValue::from_bytes(b"r\xff1").unwrap())
            .body(Body::empty())
            .unwrap();
        let res = app_with(sink.clone(), true).oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let id = res.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(sink.records()[0].request_id, id);
    }

    #[tokio::test]
    async fn unmatched_routes_are_logged_and_stamped() {
        let sink = Arc::new(MemoryAccessLog::new());
        let res = app_with(sink.clone(), true)
            .oneshot(get_request("/nope", None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let id = res.headers()[X_REQUEST_ID].to_str().unwrap();
        assert_eq!(sink.find(id).map(|r| r.status), Some(404));
    }

    #[tokio::test]
    async fn access_log_without_context_is_an_internal_fault() {
        let sink = Arc::new(MemoryAccessLog::new());
        let res = app_with(sink.clone(), false)
            .oneshot(get_request("/ping", Some("r1")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(sink.records().is_empty());
    }
}
