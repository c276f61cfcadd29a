use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use emblm_catalog::resolve_path;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

pub(crate) async fn categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "items": state.registry().records() }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveQuery {
    #[serde(default)]
    label: String,
}

/// Label to page path; unknown labels still get a path (which redirects home).
pub(crate) async fn resolve(
    State(state): State<AppState>,
    Query(q): Query<ResolveQuery>,
) -> impl IntoResponse {
    let path = resolve_path(state.registry(), &q.label);
    let known = state.registry().find_folded(&q.label).is_some();
    Json(json!({ "label": q.label, "path": path, "known": known }))
}

pub(crate) async fn routes(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "items": state.routes().entries() }))
}
