use crate::record::{CategoryRecord, DetailBlock};
use crate::registry::Registry;

/// Directory the derived hero image paths live under.
pub const LOCAL_IMAGE_PREFIX: &str = "/images/categories";

/// Substitute graphic shown when a hero image fails to load.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='1200' height='1200'><rect width='100%' height='100%' fill='%23EFE7E0'/><text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' font-size='40' fill='%23999'>No image</text></svg>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLines {
    pub first: String,
    pub second: String,
}

impl TitleLines {
    /// Split on single spaces: the first two words, then the remainder.
    pub fn split(name: &str) -> Self {
        let words: Vec<&str> = name.split(' ').collect();
        let cut = words.len().min(2);
        Self {
            first: words[..cut].join(" "),
            second: words[cut..].join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroImage {
    pub src: String,
    /// Swapped in by the page when `src` fails to load; the record is untouched.
    pub fallback: &'static str,
    pub alt: String,
}

impl HeroImage {
    pub fn for_record(record: &CategoryRecord) -> Self {
        let src = record
            .image
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| local_image_path(record));
        Self {
            src,
            fallback: PLACEHOLDER_IMAGE,
            alt: format!("{} hero", record.name),
        }
    }
}

/// `/images/categories/<slug>.jpg`.
///
/// Records loaded through [`Registry`] always carry a slug; the
/// whitespace-stripped name is only used for records built by hand.
pub fn local_image_path(record: &CategoryRecord) -> String {
    let stem = if record.slug.is_empty() {
        record.name.split_whitespace().collect::<String>()
    } else {
        record.slug.clone()
    };
    format!("{LOCAL_IMAGE_PREFIX}/{stem}.jpg")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPage<'a> {
    pub record: &'a CategoryRecord,
    pub title: TitleLines,
    pub hero: HeroImage,
    pub description: &'a str,
    pub details: &'a [DetailBlock],
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryView<'a> {
    Found(CategoryPage<'a>),
    NotFound { name: String },
}

impl CategoryView<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, CategoryView::Found(_))
    }
}

/// Build the detail view for `name` (exact match). Unknown names yield
/// [`CategoryView::NotFound`]; this never fails.
pub fn render<'a>(registry: &'a Registry, name: &str) -> CategoryView<'a> {
    match registry.by_name(name) {
        Some(record) => CategoryView::Found(CategoryPage {
            record,
            title: TitleLines::split(&record.name),
            hero: HeroImage::for_record(record),
            description: &record.description,
            details: &record.details,
        }),
        None => CategoryView::NotFound {
            name: name.to_string(),
        },
    }
}
