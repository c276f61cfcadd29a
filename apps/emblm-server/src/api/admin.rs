use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use emblm_protocol::{AssistRequest, BlogForm};
use emblm_store::content::draft_from_form;

use crate::assist::{self, AssistError};
use crate::responses::{self, problem, require_admin};
use crate::AppState;

/// Lets the editor check a token before showing the dashboard.
pub(crate) async fn session(headers: HeaderMap) -> Response {
    if let Err(r) = require_admin(&headers) {
        return *r;
    }
    StatusCode::NO_CONTENT.into_response()
}

pub(crate) async fn create_blog(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(form): Json<BlogForm>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return *r;
    }
    match state.store().create(draft_from_form(form)).await {
        Ok(post) => {
            tracing::info!(target: "emblm::admin", id = %post.id, title = %post.title(), "post created");
            (StatusCode::CREATED, Json(post)).into_response()
        }
        Err(err) => responses::store_failure(&err),
    }
}

pub(crate) async fn update_blog(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<BlogForm>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return *r;
    }
    match state.store().update(&id, draft_from_form(form)).await {
        Ok(Some(post)) => {
            tracing::info!(target: "emblm::admin", id = %post.id, "post updated");
            Json(post).into_response()
        }
        Ok(None) => responses::not_found("no such post"),
        Err(err) => responses::store_failure(&err),
    }
}

pub(crate) async fn delete_blog(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return *r;
    }
    match state.store().delete(&id).await {
        Ok(true) => {
            tracing::info!(target: "emblm::admin", id = %id, "post deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => responses::not_found("no such post"),
        Err(err) => responses::store_failure(&err),
    }
}

pub(crate) async fn assist(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return *r;
    }
    match assist::run(state.assist(), &req).await {
        Ok(out) => Json(out).into_response(),
        Err(AssistError::EmptyContent) => responses::bad_request("content is required"),
        Err(AssistError::Disabled) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            "Assist Disabled",
            Some("set EMBLM_ASSIST_API_KEY to enable content assist"),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "content assist failed");
            problem(StatusCode::BAD_GATEWAY, "Assist Failed", Some(&err.to_string()))
        }
    }
}
