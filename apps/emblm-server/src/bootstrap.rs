use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use emblm_catalog::{build_routes, FixedRoute, Registry, RouteTable, Showcase};
use emblm_store::{BlogStore, MemoryBlogStore, SqliteBlogStore};
use tracing::info;

use crate::app_state::Catalog;
use crate::assist::{ContentAssist, DisabledAssist, GeminiAssist};
use crate::config::{CatalogSection, HttpSection, SiteConfig, StoreBackend};
use crate::router::paths::RESERVED_SEGMENTS;
use crate::{access_log, router, security, AppState};

pub(crate) struct BootstrapOutput {
    pub router: axum::Router<AppState>,
    pub state: AppState,
}

/// Registry, route table, and showcase; fails on malformed or colliding data.
pub(crate) fn load_catalog(cfg: &CatalogSection) -> Result<Catalog> {
    let registry = match &cfg.categories_file {
        Some(path) => Registry::load(path)
            .with_context(|| format!("loading categories from {}", path.display()))?,
        None => Registry::embedded().context("loading built-in categories")?,
    };
    let routes = build_routes(&registry, &FixedRoute::ALL)?;
    ensure_no_reserved_paths(&routes)?;
    let showcase = Showcase::build(&registry);
    Ok(Catalog {
        registry,
        routes,
        showcase,
    })
}

fn ensure_no_reserved_paths(routes: &RouteTable) -> Result<()> {
    for route in routes.categories() {
        let segment = route.path.trim_start_matches('/');
        if RESERVED_SEGMENTS
            .iter()
            .any(|r| r.eq_ignore_ascii_case(segment))
        {
            bail!(
                "category {:?} uses reserved path {}",
                route.name,
                route.path
            );
        }
    }
    Ok(())
}

pub(crate) fn open_store(cfg: &SiteConfig) -> Result<Arc<dyn BlogStore>> {
    Ok(match cfg.store.backend {
        StoreBackend::Sqlite => Arc::new(
            SqliteBlogStore::open(&cfg.store.state_dir).with_context(|| {
                format!("opening blog store in {}", cfg.store.state_dir.display())
            })?,
        ),
        StoreBackend::Memory => Arc::new(MemoryBlogStore::new()),
    })
}

pub(crate) fn content_assist(cfg: &SiteConfig) -> Result<Arc<dyn ContentAssist>> {
    let Some(key) = cfg.assist.api_key.clone() else {
        info!("content assist disabled (no EMBLM_ASSIST_API_KEY)");
        return Ok(Arc::new(DisabledAssist));
    };
    let assist = GeminiAssist::new(
        &cfg.assist.base_url,
        &cfg.assist.model,
        key,
        Duration::from_secs(cfg.http.timeout_secs),
    )?;
    Ok(Arc::new(assist))
}

pub(crate) async fn build(cfg: &SiteConfig) -> Result<BootstrapOutput> {
    let catalog = Arc::new(load_catalog(&cfg.catalog)?);
    let store = open_store(cfg)?;
    let assist = content_assist(cfg)?;
    let (router, endpoints) = router::build_router(&catalog.routes, &cfg.catalog.images_dir);
    let state = AppState::new(catalog, store, assist, endpoints);
    Ok(BootstrapOutput { router, state })
}

pub(crate) fn attach_http_layers(
    router: axum::Router<()>,
    concurrency_limit: usize,
) -> axum::Router<()> {
    use tower::limit::ConcurrencyLimitLayer;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
}

pub(crate) fn attach_global_layers(router: axum::Router<()>) -> axum::Router<()> {
    router
        .layer(axum::middleware::from_fn(access_log::access_log_mw))
        .layer(axum::middleware::from_fn(security::headers_mw))
        .layer(axum::middleware::from_fn(security::client_addr_mw))
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum HttpConfigError {
    #[error("invalid EMBLM_HTTP_MAX_CONC: {0}")]
    InvalidConcurrency(String),
    #[error("invalid EMBLM_PORT: {0}")]
    InvalidPort(String),
    #[error("invalid EMBLM_BIND: {0}")]
    InvalidBind(String),
    #[error(
        "EMBLM_BIND={bind} is public and EMBLM_ADMIN_TOKEN/EMBLM_ADMIN_TOKEN_SHA256 not set; refusing to start"
    )]
    MissingAdminToken { bind: String },
}

pub(crate) struct HttpConfig {
    pub addr: std::net::SocketAddr,
    pub concurrency_limit: usize,
}

/// File values from `[http]`, overridden by `EMBLM_BIND`, `EMBLM_PORT`, and
/// `EMBLM_HTTP_MAX_CONC`.
pub(crate) fn http_config_from_env(file: &HttpSection) -> Result<HttpConfig, HttpConfigError> {
    let concurrency_limit = std::env::var("EMBLM_HTTP_MAX_CONC")
        .ok()
        .map(|raw| {
            raw.parse::<usize>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(HttpConfigError::InvalidConcurrency(raw))
        })
        .transpose()?
        .unwrap_or(file.max_concurrency.max(1));

    let bind = std::env::var("EMBLM_BIND").unwrap_or_else(|_| file.bind.clone());
    let port = match std::env::var("EMBLM_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| HttpConfigError::InvalidPort(raw))?,
        Err(_) => file.port,
    };

    enforce_admin_token_guard(&bind)?;

    let host = if bind.eq_ignore_ascii_case("localhost") {
        "127.0.0.1"
    } else {
        bind.as_str()
    };
    let addr = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
    .parse()
    .map_err(|_| HttpConfigError::InvalidBind(bind.clone()))?;

    Ok(HttpConfig {
        addr,
        concurrency_limit,
    })
}

fn enforce_admin_token_guard(bind: &str) -> Result<(), HttpConfigError> {
    let token_set = std::env::var("EMBLM_ADMIN_TOKEN")
        .ok()
        .is_some_and(|v| !v.is_empty())
        || std::env::var("EMBLM_ADMIN_TOKEN_SHA256")
            .ok()
            .is_some_and(|v| !v.is_empty());

    let bind_lower = bind.trim().to_ascii_lowercase();
    let is_loopback = matches!(
        bind_lower.as_str(),
        "127.0.0.1" | "::1" | "[::1]" | "localhost"
    );

    if !is_loopback && !token_set {
        return Err(HttpConfigError::MissingAdminToken {
            bind: bind.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env as test_env;
    use emblm_catalog::CategoryRecord;

    fn clear_http_env(guard: &mut test_env::EnvGuard) {
        guard.remove("EMBLM_BIND");
        guard.remove("EMBLM_PORT");
        guard.remove("EMBLM_HTTP_MAX_CONC");
        guard.remove("EMBLM_ADMIN_TOKEN");
        guard.remove("EMBLM_ADMIN_TOKEN_SHA256");
    }

    #[test]
    fn enforce_admin_token_loopback_allowed_without_token() {
        let mut guard = test_env::guard();
        clear_http_env(&mut guard);
        assert!(enforce_admin_token_guard("127.0.0.1").is_ok());
        assert!(enforce_admin_token_guard("localhost").is_ok());
    }

    #[test]
    fn enforce_admin_token_requires_token_for_public_bind() {
        let mut guard = test_env::guard();
        clear_http_env(&mut guard);
        let err = enforce_admin_token_guard("0.0.0.0").unwrap_err();
        assert!(matches!(err, HttpConfigError::MissingAdminToken { .. }));
    }

    #[test]
    fn enforce_admin_token_allows_public_bind_with_token() {
        let mut guard = test_env::guard();
        clear_http_env(&mut guard);
        guard.set("EMBLM_ADMIN_TOKEN", "token");
        assert!(enforce_admin_token_guard("0.0.0.0").is_ok());
    }

    #[test]
    fn http_config_layers_env_over_file() {
        let mut guard = test_env::guard();
        clear_http_env(&mut guard);
        let file = HttpSection {
            port: 9100,
            max_concurrency: 16,
            ..HttpSection::default()
        };
        let cfg = http_config_from_env(&file).unwrap();
        assert_eq!(cfg.addr.to_string(), "127.0.0.1:9100");
        assert_eq!(cfg.concurrency_limit, 16);

        guard.set("EMBLM_PORT", "9200");
        guard.set("EMBLM_HTTP_MAX_CONC", "4");
        guard.set("EMBLM_BIND", "::1");
        let cfg = http_config_from_env(&file).unwrap();
        assert_eq!(cfg.addr.to_string(), "[::1]:9200");
        assert_eq!(cfg.concurrency_limit, 4);
    }

    #[test]
    fn http_config_rejects_bad_values() {
        let mut guard = test_env::guard();
        clear_http_env(&mut guard);
        guard.set("EMBLM_PORT", "99999");
        assert!(matches!(
            http_config_from_env(&HttpSection::default()),
            Err(HttpConfigError::InvalidPort(_))
        ));
        guard.remove("EMBLM_PORT");
        guard.set("EMBLM_HTTP_MAX_CONC", "0");
        assert!(matches!(
            http_config_from_env(&HttpSection::default()),
            Err(HttpConfigError::InvalidConcurrency(_))
        ));
    }

    #[test]
    fn built_in_catalog_loads() {
        let catalog = load_catalog(&CatalogSection::default()).unwrap();
        assert_eq!(catalog.registry.len(), 21);
        assert_eq!(catalog.routes.len(), FixedRoute::ALL.len() + 21 + 1);
    }

    #[test]
    fn reserved_segment_is_rejected() {
        let registry = Registry::new(vec![CategoryRecord {
            name: "Health Checks".into(),
            slug: "healthz".into(),
            description: "d".into(),
            examples: vec![],
            details: vec![],
            image: None,
        }])
        .unwrap();
        let routes = build_routes(&registry, &FixedRoute::ALL).unwrap();
        assert!(ensure_no_reserved_paths(&routes).is_err());
    }

    #[test]
    fn missing_categories_file_fails_startup() {
        let cfg = CatalogSection {
            categories_file: Some("/no/such/categories.toml".into()),
            ..CatalogSection::default()
        };
        assert!(load_catalog(&cfg).is_err());
    }
}
