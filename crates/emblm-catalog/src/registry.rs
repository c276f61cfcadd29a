use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::record::{CategoryFile, CategoryRecord};

const EMBEDDED_CATEGORIES: &str = include_str!("../data/categories.toml");

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("registry is empty")]
    Empty,
    #[error("category #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("category {name:?} has an invalid slug {slug:?}")]
    InvalidSlug { name: String, slug: String },
    #[error("category {name:?} has a detail block (#{block}) without items")]
    EmptyDetailItems { name: String, block: usize },
    #[error("category {name:?} reuses key {key:?} already owned by {owner:?}")]
    DuplicateKey {
        name: String,
        key: String,
        owner: String,
    },
}

/// Immutable, validated category registry.
///
/// Records keep their source order. Every record's case-folded `name` and
/// `slug` are indexed together, so a label can never point at two records.
#[derive(Debug, Clone)]
pub struct Registry {
    records: Vec<CategoryRecord>,
    folded: HashMap<String, usize>,
    names: HashMap<String, usize>,
}

impl Registry {
    pub fn new(records: Vec<CategoryRecord>) -> Result<Self, RegistryError> {
        if records.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut folded: HashMap<String, usize> = HashMap::with_capacity(records.len() * 2);
        let mut names = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            validate_record(index, record)?;
            for key in [fold(&record.name), fold(&record.slug)] {
                match folded.get(&key) {
                    Some(&owner) if owner != index => {
                        return Err(RegistryError::DuplicateKey {
                            name: record.name.clone(),
                            key,
                            owner: records[owner].name.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        folded.insert(key, index);
                    }
                }
            }
            names.insert(record.name.clone(), index);
        }
        Ok(Self {
            records,
            folded,
            names,
        })
    }

    /// Registry compiled into the crate.
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_toml_str(EMBEDDED_CATEGORIES)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        let file: CategoryFile = toml::from_str(raw)?;
        debug!(count = file.categories.len(), "parsed category registry");
        Self::new(file.categories)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[CategoryRecord] {
        &self.records
    }

    /// Exact-equality lookup by display name.
    pub fn by_name(&self, name: &str) -> Option<&CategoryRecord> {
        self.names.get(name).map(|&i| &self.records[i])
    }

    /// Case-insensitive lookup against both `name` and `slug`.
    pub fn find_folded(&self, label: &str) -> Option<&CategoryRecord> {
        self.folded.get(&fold(label)).map(|&i| &self.records[i])
    }
}

fn fold(label: &str) -> String {
    label.to_lowercase()
}

pub(crate) fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_record(index: usize, record: &CategoryRecord) -> Result<(), RegistryError> {
    if record.name.trim().is_empty() {
        return Err(RegistryError::EmptyName { index });
    }
    if !is_url_safe_slug(&record.slug) {
        return Err(RegistryError::InvalidSlug {
            name: record.name.clone(),
            slug: record.slug.clone(),
        });
    }
    if let Some(block) = record.details.iter().position(|b| b.items.is_empty()) {
        return Err(RegistryError::EmptyDetailItems {
            name: record.name.clone(),
            block,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DetailBlock;

    fn record(name: &str, slug: &str) -> CategoryRecord {
        CategoryRecord {
            name: name.into(),
            slug: slug.into(),
            description: format!("{name} description"),
            examples: vec![],
            details: vec![],
            image: None,
        }
    }

    #[test]
    fn embedded_registry_loads_in_order() {
        let registry = Registry::embedded().expect("embedded registry");
        assert_eq!(registry.len(), 21);
        let first = registry.iter().next().unwrap();
        assert_eq!(first.name, "Brand Identity & Strategy");
        assert_eq!(first.slug, "BrandIdentity");
        assert_eq!(
            registry.iter().last().map(|r| r.slug.as_str()),
            Some("NicheEmerging")
        );
    }

    #[test]
    fn lookups_are_exact_and_folded() {
        let registry = Registry::new(vec![record("Creative Design", "CreativeDesign")]).unwrap();
        assert!(registry.by_name("Creative Design").is_some());
        assert!(registry.by_name("creative design").is_none());
        assert!(registry.find_folded("CREATIVE DESIGN").is_some());
        assert!(registry.find_folded("creativedesign").is_some());
        assert!(registry.find_folded("Creative").is_none());
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let err = Registry::new(vec![record("Design", "A"), record("design", "B")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKey { ref owner, .. } if owner == "Design"));
    }

    #[test]
    fn rejects_name_shadowing_another_slug() {
        let err = Registry::new(vec![record("Marketing & Communication", "Marketing"), record("marketing", "Other")])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKey { .. }));
    }

    #[test]
    fn same_record_may_share_name_and_slug_key() {
        let registry = Registry::new(vec![record("Technology", "technology")]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_unsafe_slugs() {
        for slug in ["", "has space", "a/b", "q?x", "ünï"] {
            let err = Registry::new(vec![record("Name", slug)]).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidSlug { .. }), "slug {slug:?}");
        }
    }

    #[test]
    fn rejects_blank_name_and_empty_items() {
        assert!(matches!(
            Registry::new(vec![record("  ", "x")]).unwrap_err(),
            RegistryError::EmptyName { index: 0 }
        ));

        let mut r = record("Name", "Name");
        r.details.push(DetailBlock {
            title: Some("Services".into()),
            subtitle: None,
            items: vec![],
        });
        assert!(matches!(
            Registry::new(vec![r]).unwrap_err(),
            RegistryError::EmptyDetailItems { block: 0, .. }
        ));
    }

    #[test]
    fn empty_registry_is_an_error() {
        assert!(matches!(Registry::new(vec![]).unwrap_err(), RegistryError::Empty));
        assert!(matches!(
            Registry::from_toml_str("").unwrap_err(),
            RegistryError::Empty
        ));
    }

    #[test]
    fn missing_description_fails_to_parse() {
        let raw = r#"
            [[category]]
            name = "X"
            slug = "X"
        "#;
        assert!(matches!(
            Registry::from_toml_str(raw).unwrap_err(),
            RegistryError::Parse(_)
        ));
    }
}
