use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

tokio::task_local! {
    static CLIENT_ADDR: Option<String>;
}

// Blog and category heroes load remote https images and fall back to an inline
// data URI through an `onerror` handler.
const SITE_CSP: &str = "default-src 'self'; img-src 'self' https: data:; style-src 'self' 'unsafe-inline'; script-src 'self' 'unsafe-inline'; connect-src 'self'; frame-ancestors 'none'";

fn csp_value() -> Option<String> {
    if let Ok(v) = std::env::var("EMBLM_CSP") {
        let t = v.trim();
        if t.eq_ignore_ascii_case("off") || t == "0" {
            return None;
        }
        if !t.is_empty() {
            return Some(t.to_string());
        }
    }
    Some(SITE_CSP.to_string())
}

pub async fn client_addr_mw(req: Request<axum::body::Body>, next: Next) -> Response {
    let ip = extract_client_addr(&req);
    CLIENT_ADDR
        .scope(ip, async move { next.run(req).await })
        .await
}

pub fn client_addr() -> Option<String> {
    CLIENT_ADDR.try_with(|opt| opt.clone()).unwrap_or(None)
}

/// `X-Forwarded-For` is only honoured behind a proxy that sets it
/// (`EMBLM_TRUST_FORWARD_HEADERS=1`); otherwise clients could pick their own
/// rate-limit key.
fn trust_forward_headers() -> bool {
    std::env::var("EMBLM_TRUST_FORWARD_HEADERS").ok().as_deref() == Some("1")
}

fn extract_client_addr<B>(req: &Request<B>) -> Option<String> {
    if trust_forward_headers() {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .find(|part| !part.is_empty())
                    .map(str::to_string)
            });
        if forwarded.is_some() {
            return forwarded;
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
}

fn add_header_if_absent(h: &mut HeaderMap, name: &'static str, val: &str) {
    let name = HeaderName::from_static(name);
    if h.contains_key(&name) {
        return;
    }
    if let Ok(v) = HeaderValue::from_str(val) {
        h.insert(name, v);
    }
}

pub async fn headers_mw(req: Request<axum::body::Body>, next: Next) -> Response {
    let mut res = next.run(req).await;
    let h = res.headers_mut();
    add_header_if_absent(h, "x-content-type-options", "nosniff");
    add_header_if_absent(h, "x-frame-options", "DENY");
    let refpol =
        std::env::var("EMBLM_REFERRER_POLICY").unwrap_or_else(|_| "strict-origin-when-cross-origin".into());
    add_header_if_absent(h, "referrer-policy", &refpol);
    add_header_if_absent(
        h,
        "permissions-policy",
        "geolocation=(), microphone=(), camera=()",
    );
    if std::env::var("EMBLM_HSTS").ok().as_deref() == Some("1") {
        add_header_if_absent(
            h,
            "strict-transport-security",
            "max-age=31536000; includeSubDomains",
        );
    }
    let is_html = h
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false);
    if is_html {
        if let Some(v) = csp_value() {
            add_header_if_absent(h, "content-security-policy", &v);
        }
    }
    res
}

#[derive(Clone, Copy)]
struct RateLimitConfig {
    max: usize,
    window: Duration,
}

fn rate_limit_config() -> RateLimitConfig {
    let max = std::env::var("EMBLM_ADMIN_RATE_LIMIT")
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(60);
    let window_secs = std::env::var("EMBLM_ADMIN_RATE_WINDOW_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(60);
    RateLimitConfig {
        max,
        window: Duration::from_secs(window_secs),
    }
}

type HitLog = HashMap<String, VecDeque<Instant>>;

static ADMIN_RATE_LIMITER: Lazy<Mutex<HitLog>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Sliding-window limiter keyed on token fingerprint and client address.
/// `EMBLM_ADMIN_RATE_LIMIT=0` disables it.
pub(crate) fn admin_rate_limit_allow(fingerprint: &str, ip: Option<&str>) -> bool {
    let cfg = rate_limit_config();
    if cfg.max == 0 {
        return true;
    }
    let key = format!("{}@{}", fingerprint, ip.unwrap_or("unknown"));
    let mut map = match ADMIN_RATE_LIMITER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    record_hit(&mut map, key, Instant::now(), cfg)
}

fn record_hit(map: &mut HitLog, key: String, now: Instant, cfg: RateLimitConfig) -> bool {
    // Expire every key's old hits, then forget keys with none left.
    for hits in map.values_mut() {
        while hits
            .front()
            .is_some_and(|ts| now.saturating_duration_since(*ts) > cfg.window)
        {
            hits.pop_front();
        }
    }
    map.retain(|_, hits| !hits.is_empty());
    let entry = map.entry(key).or_default();
    if entry.len() >= cfg.max {
        return false;
    }
    entry.push_back(now);
    true
}

#[cfg(test)]
pub(crate) fn reset_admin_rate_limiter_for_tests() {
    if let Ok(mut guard) = ADMIN_RATE_LIMITER.lock() {
        guard.clear();
    }
}
