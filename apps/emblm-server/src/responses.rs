use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use emblm_protocol::ProblemDetails;

pub fn problem(status: StatusCode, title: &str, detail: Option<&str>) -> Response {
    let mut body = ProblemDetails::new(status.as_u16(), title);
    if let Some(d) = detail {
        body = body.with_detail(d);
    }
    (status, Json(body)).into_response()
}

pub fn unauthorized() -> Response {
    problem(StatusCode::UNAUTHORIZED, "Unauthorized", None)
}

pub fn bad_request(detail: &str) -> Response {
    problem(StatusCode::BAD_REQUEST, "Bad Request", Some(detail))
}

pub fn not_found(detail: &str) -> Response {
    problem(StatusCode::NOT_FOUND, "Not Found", Some(detail))
}

pub fn store_failure(err: &emblm_store::StoreError) -> Response {
    match err {
        emblm_store::StoreError::Invalid(msg) => bad_request(msg),
        other => {
            tracing::error!(error = %other, "blog store failure");
            problem(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store Error",
                Some("the blog store is unavailable"),
            )
        }
    }
}

/// Gate for admin handlers: rate limit first, then the token check.
pub fn require_admin(headers: &HeaderMap) -> Result<(), Box<Response>> {
    let fingerprint = crate::presented_token_fingerprint(headers);
    let ip = crate::security::client_addr();
    if !crate::security::admin_rate_limit_allow(&fingerprint, ip.as_deref()) {
        return Err(Box::new(problem(
            StatusCode::TOO_MANY_REQUESTS,
            "Too Many Requests",
            Some("admin rate limit exceeded"),
        )));
    }
    if !crate::admin_ok(headers) {
        return Err(Box::new(unauthorized()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn problem_body_carries_status_and_detail() {
        let res = problem(StatusCode::BAD_GATEWAY, "Assist Failed", Some("upstream 500"));
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], 502);
        assert_eq!(v["title"], "Assist Failed");
        assert_eq!(v["detail"], "upstream 500");
    }

    #[test]
    fn invalid_post_maps_to_bad_request() {
        let res = store_failure(&emblm_store::StoreError::Invalid("title is required".into()));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = store_failure(&emblm_store::StoreError::Join("boom".into()));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
