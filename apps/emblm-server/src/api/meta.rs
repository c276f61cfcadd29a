use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// Health probe.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

/// Service metadata and endpoints index.
pub(crate) async fn meta(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": "emblm-server",
        "version": env!("CARGO_PKG_VERSION"),
        "categories": state.registry().len(),
        "routes": state.routes().len(),
        "store": state.store().backend(),
        "assist": state.assist().enabled(),
        "endpoints": state.endpoints(),
    }))
}
