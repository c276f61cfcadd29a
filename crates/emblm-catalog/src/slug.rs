use crate::registry::Registry;

/// Derive a URL segment from a free-text label.
///
/// Everything except ASCII letters and digits is dropped (whitespace
/// included); case is preserved. An empty result means "no route".
pub fn make_slug(label: &str) -> String {
    label.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Resolve a label to a registry path, or a derived best-effort path.
///
/// A case-insensitive hit on a record's `name` or `slug` returns that
/// record's stored slug. Anything else falls back to `/` + [`make_slug`],
/// which may not correspond to a registered route.
pub fn resolve_path(registry: &Registry, item: &str) -> String {
    match registry.find_folded(item) {
        Some(record) => record.path(),
        None => format!("/{}", make_slug(item)),
    }
}

/// `"ConsumerLifestyle"` -> `"Consumer Lifestyle"`.
pub fn split_camel_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 4);
    for c in token.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}
