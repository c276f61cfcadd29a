use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use sha2::Digest as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Clone, Debug)]
struct Cfg {
    enabled: bool,
    sample_n: u64,
    ua_hash: bool,
    referer: bool,
}

static CFG: Lazy<Cfg> = Lazy::new(|| Cfg {
    enabled: std::env::var("EMBLM_ACCESS_LOG").ok().as_deref() == Some("1"),
    sample_n: std::env::var("EMBLM_ACCESS_SAMPLE_N")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
        .max(1),
    ua_hash: std::env::var("EMBLM_ACCESS_UA_HASH").ok().as_deref() == Some("1"),
    referer: std::env::var("EMBLM_ACCESS_REF").ok().as_deref() == Some("1"),
});

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn ua_fingerprint(ua: &str) -> String {
    let digest = sha2::Sha256::digest(ua.as_bytes());
    hex::encode(&digest[..8])
}

/// Referrer without its query string.
fn referer_origin_path(raw: &str) -> &str {
    raw.split(['?', '#']).next().unwrap_or("")
}

/// One `http.access` event per sampled request. Category pages are logged
/// under their concrete path since each one is its own route.
pub async fn access_log_mw(req: Request<axum::body::Body>, next: Next) -> Response {
    if !CFG.enabled {
        return next.run(req).await;
    }
    let started = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let ua = CFG
        .ua_hash
        .then(|| {
            req.headers()
                .get(axum::http::header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .map(ua_fingerprint)
        })
        .flatten();
    let referer = CFG
        .referer
        .then(|| {
            req.headers()
                .get(axum::http::header::REFERER)
                .and_then(|h| h.to_str().ok())
                .map(|r| referer_origin_path(r).to_string())
        })
        .flatten();
    let remote = crate::security::client_addr();

    let res = next.run(req).await;
    let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    if CFG.sample_n > 1 && n % CFG.sample_n != 0 {
        return res;
    }
    tracing::info!(
        target: emblm_otel::ACCESS_TARGET,
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        dur_ms = started.elapsed().as_millis() as u64,
        remote = remote.as_deref().unwrap_or("-"),
        ua_hash = ua.as_deref().unwrap_or("-"),
        referer = referer.as_deref().unwrap_or("-"),
        "request"
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referer_drops_query_and_fragment() {
        assert_eq!(
            referer_origin_path("https://theemblm.com/thought-hub?post=abc#top"),
            "https://theemblm.com/thought-hub"
        );
        assert_eq!(referer_origin_path(""), "");
    }

    #[test]
    fn ua_fingerprint_is_short_and_stable() {
        let a = ua_fingerprint("Mozilla/5.0");
        assert_eq!(a.len(), 16);
        assert_eq!(a, ua_fingerprint("Mozilla/5.0"));
        assert_ne!(a, ua_fingerprint("curl/8.0"));
    }
}
