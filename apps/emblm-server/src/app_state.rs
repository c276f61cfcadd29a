use std::sync::Arc;

use emblm_catalog::{Registry, RouteTable, Showcase};
use emblm_store::BlogStore;

use crate::assist::ContentAssist;

/// Read-only catalog data built once at startup.
pub(crate) struct Catalog {
    pub registry: Registry,
    pub routes: RouteTable,
    pub showcase: Showcase,
}

#[derive(Clone)]
pub(crate) struct AppState {
    catalog: Arc<Catalog>,
    store: Arc<dyn BlogStore>,
    assist: Arc<dyn ContentAssist>,
    endpoints: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn BlogStore>,
        assist: Arc<dyn ContentAssist>,
        endpoints: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            assist,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.catalog.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.catalog.routes
    }

    pub fn showcase(&self) -> &Showcase {
        &self.catalog.showcase
    }

    pub fn store(&self) -> &dyn BlogStore {
        self.store.as_ref()
    }

    pub fn assist(&self) -> &dyn ContentAssist {
        self.assist.as_ref()
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}
