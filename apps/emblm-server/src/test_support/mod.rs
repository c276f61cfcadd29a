use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use emblm_store::MemoryBlogStore;

use crate::assist::{ContentAssist, DisabledAssist};
use crate::bootstrap;
use crate::config::CatalogSection;
use crate::AppState;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub(crate) mod env {
    use super::*;

    /// Serialises env mutation across tests and restores touched keys on drop.
    pub(crate) struct EnvGuard {
        _lock: MutexGuard<'static, ()>,
        saved: HashMap<String, Option<String>>,
    }

    pub(crate) fn guard() -> EnvGuard {
        // A panicking test must not wedge every later one.
        let lock = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        EnvGuard {
            _lock: lock,
            saved: HashMap::new(),
        }
    }

    impl EnvGuard {
        fn remember(&mut self, key: &str) {
            self.saved
                .entry(key.to_string())
                .or_insert_with(|| std::env::var(key).ok());
        }

        pub(crate) fn set(&mut self, key: &str, value: impl AsRef<str>) {
            self.remember(key);
            std::env::set_var(key, value.as_ref());
        }

        pub(crate) fn set_opt(&mut self, key: &str, value: Option<&str>) {
            self.remember(key);
            match value {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.set_opt(key, None);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain() {
                match value {
                    Some(val) => std::env::set_var(&key, val),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}

/// State over the built-in catalog and an in-memory store.
pub(crate) fn state_with(assist: Arc<dyn ContentAssist>) -> AppState {
    let catalog = bootstrap::load_catalog(&CatalogSection::default())
        .unwrap_or_else(|e| panic!("built-in catalog: {e:#}"));
    let catalog = Arc::new(catalog);
    let (_, endpoints) = crate::router::build_router(&catalog.routes, Path::new("."));
    AppState::new(
        catalog,
        Arc::new(MemoryBlogStore::new()),
        assist,
        endpoints,
    )
}

/// Full page and API router with assist disabled.
pub(crate) fn app() -> axum::Router {
    app_with(Arc::new(DisabledAssist))
}

pub(crate) fn app_with(assist: Arc<dyn ContentAssist>) -> axum::Router {
    let state = state_with(assist);
    let (router, _) = crate::router::build_router(&state.routes().clone(), Path::new("."));
    router.with_state(state)
}
