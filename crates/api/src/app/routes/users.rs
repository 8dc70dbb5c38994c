//! `/users` endpoints.
//!
//! Status mapping differs per endpoint: a failed lookup on GET is always 404,
//! while PUT and DELETE answer 500 for any store failure, not-found included.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use userbook_core::{UserDraft, UserId};
use userbook_infra::StoreError;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<dto::UserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = parse_body(&ctx, body)?;

    let user = services
        .store()
        .create(&services.store_context(&ctx), &draft)
        .await
        .map_err(|e| store_failure(&ctx, "create", e, ApiError::Internal))?;

    Ok((StatusCode::CREATED, Json(dto::user_to_json(&user))))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&ctx, path)?;

    let user = services
        .store()
        .get_by_id(&services.store_context(&ctx), id)
        .await
        .map_err(|e| store_failure(&ctx, "get_by_id", e, ApiError::NotFound))?;

    Ok(Json(dto::user_view_to_json(&user, services.today())))
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<dto::UserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&ctx, path)?;
    let draft = parse_body(&ctx, body)?;

    let user = services
        .store()
        .update(&services.store_context(&ctx), id, &draft)
        .await
        .map_err(|e| store_failure(&ctx, "update", e, ApiError::Internal))?;

    Ok(Json(dto::user_to_json(&user)))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&ctx, path)?;

    services
        .store()
        .delete(&services.store_context(&ctx), id)
        .await
        .map_err(|e| store_failure(&ctx, "delete", e, ApiError::Internal))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, ApiError> {
    let users = services
        .store()
        .list(&services.store_context(&ctx))
        .await
        .map_err(|e| store_failure(&ctx, "list", e, ApiError::Internal))?;

    let today = services.today();
    let items = users
        .iter()
        .map(|u| dto::user_view_to_json(u, today))
        .collect::<Vec<_>>();
    Ok(Json(items))
}

fn parse_id(
    ctx: &RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<UserId, ApiError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(
            request_id = %ctx.request_id(),
            error = %rejection.body_text(),
            "rejected user id"
        );
        ApiError::InvalidId
    })?;
    Ok(raw.parse::<UserId>()?)
}

fn parse_body(
    ctx: &RequestContext,
    body: Result<Json<dto::UserPayload>, JsonRejection>,
) -> Result<UserDraft, ApiError> {
    let Json(payload) = body.map_err(|rejection| {
        tracing::debug!(
            request_id = %ctx.request_id(),
            error = %rejection.body_text(),
            "rejected request body"
        );
        ApiError::Validation("malformed request body".to_string())
    })?;
    Ok(payload.into_draft()?)
}

/// Log the store cause, answer with `mapped`.
fn store_failure(
    ctx: &RequestContext,
    operation: &'static str,
    err: StoreError,
    mapped: ApiError,
) -> ApiError {
    if err.is_not_found() {
        tracing::info!(request_id = %ctx.request_id(), operation, "user not found");
    } else {
        tracing::error!(
            request_id = %ctx.request_id(),
            operation,
            error = %err,
            "store operation failed"
        );
    }
    mapped
}
