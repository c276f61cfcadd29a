use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One entry of the category registry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CategoryRecord {
    /// Display label. Unique within the registry; may contain spaces and punctuation.
    pub name: String,
    /// URL path segment (without the leading `/`).
    pub slug: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailBlock>,
    /// Absolute hero image URL; a local path is derived when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CategoryRecord {
    /// Route path for this record: `/` + slug.
    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DetailBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub items: Vec<String>,
}

/// On-disk shape of a registry file: a list of `[[category]]` tables.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryFile {
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryRecord>,
}
