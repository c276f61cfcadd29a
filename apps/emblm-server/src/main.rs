use axum::http::HeaderMap;
use sha2::Digest as _;
use std::net::SocketAddr;
use tracing::{error, info};

mod access_log;
mod api;
mod app_state;
mod assist;
mod bootstrap;
pub mod config;
mod http_client;
mod pages;
mod responses;
mod router;
mod security;
#[cfg(test)]
mod test_support;

pub(crate) use app_state::AppState;

#[tokio::main]
async fn main() {
    if std::env::args().nth(1).as_deref() == Some("--config-schema") {
        match serde_json::to_string_pretty(&config::config_schema_json()) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    emblm_otel::init();

    let cfg = match config::discover() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    };

    let http_cfg = match bootstrap::http_config_from_env(&cfg.http) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let bootstrap::BootstrapOutput { router, state } = match bootstrap::build(&cfg).await {
        Ok(out) => out,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    };
    info!(
        categories = state.registry().len(),
        routes = state.routes().len(),
        store = state.store().backend(),
        assist = state.assist().enabled(),
        "site ready"
    );

    let app = bootstrap::attach_global_layers(bootstrap::attach_http_layers(
        router.with_state::<()>(state),
        http_cfg.concurrency_limit,
    ));

    let listener = match tokio::net::TcpListener::bind(http_cfg.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("error: failed to bind {}: {err}", http_cfg.addr);
            std::process::exit(2);
        }
    };
    info!(addr = %http_cfg.addr, "listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!("http server exited with error: {err}");
    }
    info!("server stopped");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}

fn env_truthy(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Token from `Authorization: Bearer` or `X-Emblm-Admin`.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|hv| hv.strip_prefix("Bearer "))
        .or_else(|| headers.get("X-Emblm-Admin").and_then(|h| h.to_str().ok()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn sha256_hex(input: &str) -> String {
    hex::encode(sha2::Sha256::digest(input.as_bytes()))
}

/// Short, non-reversible key for rate limiting.
pub(crate) fn presented_token_fingerprint(headers: &HeaderMap) -> String {
    match presented_token(headers) {
        Some(tok) => sha256_hex(tok)[..12].to_string(),
        None => "anon".to_string(),
    }
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

pub(crate) fn admin_ok(headers: &HeaderMap) -> bool {
    // Debug mode opens admin surfaces for local development.
    if env_truthy("EMBLM_DEBUG") {
        return true;
    }
    let token_plain = std::env::var("EMBLM_ADMIN_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    let token_hash = std::env::var("EMBLM_ADMIN_TOKEN_SHA256")
        .ok()
        .filter(|t| !t.is_empty());
    if token_plain.is_none() && token_hash.is_none() {
        return false;
    }
    let Some(presented) = presented_token(headers) else {
        return false;
    };
    let hash_ok = token_hash.is_some_and(|want| {
        ct_eq(
            want.trim().to_ascii_lowercase().as_bytes(),
            sha256_hex(presented).as_bytes(),
        )
    });
    let plain_ok = token_plain.is_some_and(|p| ct_eq(p.as_bytes(), presented.as_bytes()));
    hash_ok || plain_ok
}
