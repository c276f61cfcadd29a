use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::responses;
use crate::AppState;

/// Newest first.
pub(crate) async fn list(State(state): State<AppState>) -> Response {
    match state.store().list().await {
        Ok(items) => Json(json!({ "items": items })).into_response(),
        Err(err) => responses::store_failure(&err),
    }
}

pub(crate) async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store().get(&id).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => responses::not_found("no such post"),
        Err(err) => responses::store_failure(&err),
    }
}
