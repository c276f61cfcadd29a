use std::mem;
use std::path::Path;

use axum::{
    extract::State,
    handler::Handler,
    response::{IntoResponse, Redirect},
    routing::{delete, get, post, put},
    Router,
};
use emblm_catalog::routes::REDIRECT_TARGET;
use emblm_catalog::{FixedRoute, RouteTable};
use tower_http::services::ServeDir;

use crate::{api, pages, AppState};

pub(crate) struct RouterBuilder {
    router: Router<AppState>,
    endpoints: Vec<String>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
        }
    }

    fn record(&mut self, method: &str, path: &str) {
        self.endpoints.push(format!("{} {}", method, path));
    }

    pub fn route_get<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("GET", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, get(handler));
        self
    }

    pub fn route_post<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("POST", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, post(handler));
        self
    }

    pub fn route_put<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("PUT", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, put(handler));
        self
    }

    pub fn route_delete<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("DELETE", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, delete(handler));
        self
    }

    pub fn build(self) -> (Router<AppState>, Vec<String>) {
        (self.router, self.endpoints)
    }
}

pub(crate) mod paths {
    pub const HEALTHZ: &str = "/healthz";
    pub const SITE_CSS: &str = "/assets/site.css";
    pub const CATEGORY_IMAGES: &str = "/images/categories";
    pub const API_META: &str = "/api/meta";
    pub const API_CATEGORIES: &str = "/api/categories";
    pub const API_CATEGORIES_RESOLVE: &str = "/api/categories/resolve";
    pub const API_ROUTES: &str = "/api/routes";
    pub const API_BLOGS: &str = "/api/blogs";
    pub const API_BLOGS_ID: &str = "/api/blogs/{id}";
    pub const ADMIN_SESSION: &str = "/api/admin/session";
    pub const ADMIN_BLOGS: &str = "/api/admin/blogs";
    pub const ADMIN_BLOGS_ID: &str = "/api/admin/blogs/{id}";
    pub const ADMIN_ASSIST: &str = "/api/admin/assist";

    /// Top-level segments owned by the service; no category slug may use them.
    pub const RESERVED_SEGMENTS: &[&str] = &["api", "assets", "images", "healthz"];
}

/// Mount the page route table (fixed pages, one GET per category, wildcard
/// redirect) plus the service endpoints.
pub(crate) fn build_router(routes: &RouteTable, images_dir: &Path) -> (Router<AppState>, Vec<String>) {
    let mut builder = RouterBuilder::new();
    for fixed in routes.fixed() {
        match fixed {
            FixedRoute::Home => builder.route_get(fixed.path(), pages::home::page),
            FixedRoute::About => builder.route_get(fixed.path(), pages::about::page),
            FixedRoute::Work => builder.route_get(fixed.path(), pages::work::page),
            FixedRoute::ThoughtHub => builder.route_get(fixed.path(), pages::thought_hub::page),
            FixedRoute::Contact => builder
                .route_get(fixed.path(), pages::contact::page)
                .route_post(fixed.path(), pages::contact::submit),
        };
    }
    for route in routes.categories() {
        let name = route.name.clone();
        builder.route_get(&route.path, move |state: State<AppState>| {
            pages::category::page(state, name.clone())
        });
    }

    builder.route_get(paths::HEALTHZ, api::meta::healthz);
    builder.route_get(paths::SITE_CSS, pages::site_css);
    builder.route_get(paths::API_META, api::meta::meta);
    builder.route_get(paths::API_CATEGORIES, api::catalog::categories);
    builder.route_get(paths::API_CATEGORIES_RESOLVE, api::catalog::resolve);
    builder.route_get(paths::API_ROUTES, api::catalog::routes);
    builder.route_get(paths::API_BLOGS, api::blogs::list);
    builder.route_get(paths::API_BLOGS_ID, api::blogs::get_one);
    builder.route_post(paths::ADMIN_SESSION, api::admin::session);
    builder.route_post(paths::ADMIN_BLOGS, api::admin::create_blog);
    builder.route_put(paths::ADMIN_BLOGS_ID, api::admin::update_blog);
    builder.route_delete(paths::ADMIN_BLOGS_ID, api::admin::delete_blog);
    builder.route_post(paths::ADMIN_ASSIST, api::admin::assist);

    let (router, mut endpoints) = builder.build();
    endpoints.push(format!("GET {}/*", paths::CATEGORY_IMAGES));
    let router = router
        .nest_service(paths::CATEGORY_IMAGES, ServeDir::new(images_dir))
        .fallback(unmatched);
    (router, endpoints)
}

/// Any path outside the table lands on the home page.
async fn unmatched() -> impl IntoResponse {
    Redirect::to(REDIRECT_TARGET)
}
