//! Category registry and everything derived from it: slugs, the page route
//! table, category detail views, and the design/audience showcase.

pub mod pairings;
pub mod record;
pub mod registry;
pub mod routes;
pub mod slug;
pub mod view;

pub use pairings::Showcase;
pub use record::{CategoryRecord, DetailBlock};
pub use registry::{Registry, RegistryError};
pub use routes::{
    build_routes, FixedRoute, ResolvedRoute, RouteEntry, RouteTable, RouteTableError,
    RouteTarget,
};
pub use slug::{make_slug, resolve_path, split_camel_case};
pub use view::{render, CategoryPage, CategoryView, HeroImage, TitleLines};
