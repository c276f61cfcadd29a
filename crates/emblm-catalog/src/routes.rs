use std::collections::HashMap;

use serde::Serialize;

use crate::registry::Registry;

/// Hand-written page routes that sit in front of the generated category routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedRoute {
    Home,
    About,
    Work,
    ThoughtHub,
    Contact,
}

impl FixedRoute {
    pub const ALL: [FixedRoute; 5] = [
        FixedRoute::Home,
        FixedRoute::About,
        FixedRoute::Work,
        FixedRoute::ThoughtHub,
        FixedRoute::Contact,
    ];

    pub fn path(self) -> &'static str {
        match self {
            FixedRoute::Home => "/",
            FixedRoute::About => "/about",
            FixedRoute::Work => "/work",
            FixedRoute::ThoughtHub => "/thought-hub",
            FixedRoute::Contact => "/contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FixedRoute::Home => "Home",
            FixedRoute::About => "About",
            FixedRoute::Work => "Work",
            FixedRoute::ThoughtHub => "Thought Hub",
            FixedRoute::Contact => "Contact",
        }
    }
}

/// Generated route pairing a category path with the name the detail view is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub path: String,
    pub name: String,
}

/// What a request path maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget<'a> {
    Fixed(FixedRoute),
    Category(&'a str),
    Redirect(&'static str),
}

/// Flattened, serialisable view of one table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteEntry {
    Fixed { path: String, page: FixedRoute },
    Category { path: String, name: String },
    Redirect { path: String, to: String },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route path {path} is registered more than once ({first} and {second})")]
    Collision {
        path: String,
        first: String,
        second: String,
    },
}

pub const WILDCARD: &str = "*";
pub const REDIRECT_TARGET: &str = "/";

/// Ordered page route table: fixed routes, then one route per category, then
/// the wildcard redirect. Built once and never rebuilt per request.
#[derive(Debug, Clone)]
pub struct RouteTable {
    fixed: Vec<FixedRoute>,
    categories: Vec<ResolvedRoute>,
}

impl RouteTable {
    pub fn fixed(&self) -> &[FixedRoute] {
        &self.fixed
    }

    pub fn categories(&self) -> &[ResolvedRoute] {
        &self.categories
    }

    /// Number of entries including the wildcard.
    pub fn len(&self) -> usize {
        self.fixed.len() + self.categories.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn resolve(&self, path: &str) -> RouteTarget<'_> {
        if let Some(fixed) = self.fixed.iter().find(|f| f.path() == path) {
            return RouteTarget::Fixed(*fixed);
        }
        if let Some(route) = self.categories.iter().find(|r| r.path == path) {
            return RouteTarget::Category(&route.name);
        }
        RouteTarget::Redirect(REDIRECT_TARGET)
    }

    pub fn entries(&self) -> Vec<RouteEntry> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.fixed.iter().map(|f| RouteEntry::Fixed {
            path: f.path().to_string(),
            page: *f,
        }));
        out.extend(self.categories.iter().map(|r| RouteEntry::Category {
            path: r.path.clone(),
            name: r.name.clone(),
        }));
        out.push(RouteEntry::Redirect {
            path: WILDCARD.to_string(),
            to: REDIRECT_TARGET.to_string(),
        });
        out
    }
}

/// Expand the registry into the page route table.
pub fn build_routes(
    registry: &Registry,
    fixed: &[FixedRoute],
) -> Result<RouteTable, RouteTableError> {
    let mut owners: HashMap<String, String> = HashMap::with_capacity(fixed.len() + registry.len());
    for f in fixed {
        claim(&mut owners, f.path().to_string(), f.label())?;
    }
    let mut categories = Vec::with_capacity(registry.len());
    for record in registry.iter() {
        let path = record.path();
        claim(&mut owners, path.clone(), &record.name)?;
        categories.push(ResolvedRoute {
            path,
            name: record.name.clone(),
        });
    }
    Ok(RouteTable {
        fixed: fixed.to_vec(),
        categories,
    })
}

fn claim(
    owners: &mut HashMap<String, String>,
    path: String,
    owner: &str,
) -> Result<(), RouteTableError> {
    if let Some(first) = owners.get(&path) {
        return Err(RouteTableError::Collision {
            first: first.clone(),
            second: owner.to_string(),
            path,
        });
    }
    owners.insert(path, owner.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CategoryRecord;

    fn record(name: &str, slug: &str) -> CategoryRecord {
        CategoryRecord {
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            examples: vec![],
            details: vec![],
            image: None,
        }
    }

    #[test]
    fn one_route_per_record() {
        let registry = Registry::embedded().unwrap();
        let table = build_routes(&registry, &FixedRoute::ALL).unwrap();
        assert_eq!(table.categories().len(), registry.len());
        for record in registry.iter() {
            let hits = table
                .categories()
                .iter()
                .filter(|r| r.path == format!("/{}", record.slug))
                .count();
            assert_eq!(hits, 1, "{}", record.name);
        }
        assert_eq!(table.len(), FixedRoute::ALL.len() + registry.len() + 1);
    }

    #[test]
    fn entries_put_fixed_first_and_wildcard_last() {
        let registry = Registry::embedded().unwrap();
        let table = build_routes(&registry, &FixedRoute::ALL).unwrap();
        let entries = table.entries();
        let paths: Vec<&str> = entries
            .iter()
            .map(|e| match e {
                RouteEntry::Fixed { path, .. }
                | RouteEntry::Category { path, .. }
                | RouteEntry::Redirect { path, .. } => path.as_str(),
            })
            .collect();
        assert_eq!(&paths[..5], &["/", "/about", "/work", "/thought-hub", "/contact"]);
        assert_eq!(paths[5], "/BrandIdentity");
        assert_eq!(*paths.last().unwrap(), "*");
    }

    #[test]
    fn resolve_dispatches_and_redirects_unknown() {
        let registry = Registry::embedded().unwrap();
        let table = build_routes(&registry, &FixedRoute::ALL).unwrap();
        assert_eq!(table.resolve("/"), RouteTarget::Fixed(FixedRoute::Home));
        assert_eq!(table.resolve("/thought-hub"), RouteTarget::Fixed(FixedRoute::ThoughtHub));
        assert_eq!(
            table.resolve("/Marketing"),
            RouteTarget::Category("Marketing & Communication")
        );
        assert_eq!(table.resolve("/this-does-not-exist"), RouteTarget::Redirect("/"));
        // Matching is exact; case variants are not registered.
        assert_eq!(table.resolve("/marketing"), RouteTarget::Redirect("/"));
        assert_eq!(table.resolve("/TotallyUnknownThing"), RouteTarget::Redirect("/"));
    }

    #[test]
    fn slug_shadowing_a_fixed_route_is_rejected() {
        let registry = Registry::new(vec![record("About Us", "about")]).unwrap();
        let err = build_routes(&registry, &FixedRoute::ALL).unwrap_err();
        assert_eq!(
            err,
            RouteTableError::Collision {
                path: "/about".into(),
                first: "About".into(),
                second: "About Us".into(),
            }
        );
    }

    #[test]
    fn fixed_subset_is_respected() {
        let registry = Registry::new(vec![record("About Us", "about")]).unwrap();
        let table = build_routes(&registry, &[FixedRoute::Home]).unwrap();
        assert_eq!(table.resolve("/about"), RouteTarget::Category("About Us"));
        assert_eq!(table.resolve("/work"), RouteTarget::Redirect("/"));
    }

    #[test]
    fn entries_serialise_with_kind_tag() {
        let registry = Registry::new(vec![record("Design", "Design")]).unwrap();
        let table = build_routes(&registry, &[FixedRoute::Home]).unwrap();
        let json = serde_json::to_value(table.entries()).unwrap();
        assert_eq!(json[0]["kind"], "fixed");
        assert_eq!(json[0]["page"], "home");
        assert_eq!(json[1]["kind"], "category");
        assert_eq!(json[1]["name"], "Design");
        assert_eq!(json[2]["kind"], "redirect");
        assert_eq!(json[2]["to"], "/");
    }
}
