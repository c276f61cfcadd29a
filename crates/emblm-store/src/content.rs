//! Text helpers shared by the admin flow and the blog views.

use emblm_protocol::{BlogDraft, BlogForm};
use once_cell::sync::Lazy;
use regex::Regex;

const WORDS_PER_MINUTE: f64 = 200.0;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Reading time in whole minutes at 200 wpm, never less than one.
pub fn estimate_read_minutes(html: &str) -> u32 {
    if html.is_empty() {
        return 1;
    }
    let words = strip_tags(html).split_whitespace().count();
    ((words as f64 / WORDS_PER_MINUTE).round() as u32).max(1)
}

/// Stored form, e.g. `"4 min"`.
pub fn format_read_time(minutes: u32) -> String {
    format!("{minutes} min")
}

/// Read time shown on a post: the stored value, else an estimate as `"N min read"`.
pub fn display_read_time(stored: Option<&str>, html: &str) -> String {
    match stored.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.to_string(),
        None => format!("{} min read", estimate_read_minutes(html)),
    }
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plain-text teaser: tags stripped, first `max_chars` characters, then `...`.
pub fn plain_excerpt(html: &str, max_chars: usize) -> String {
    let text: String = strip_tags(html).chars().take(max_chars).collect();
    format!("{text}...")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Turn the admin form into a storable draft, filling in the read time when left blank.
pub fn draft_from_form(form: BlogForm) -> BlogDraft {
    let read_time =
        non_empty(form.read_time).or_else(|| Some(format_read_time(estimate_read_minutes(&form.content))));
    BlogDraft {
        title: form.title.trim().to_string(),
        category: form.category.trim().to_string(),
        image_url: non_empty(form.image_url),
        author: non_empty(form.author),
        excerpt: non_empty(form.excerpt),
        tags: form.tags.as_deref().map(parse_tags).unwrap_or_default(),
        read_time,
        ai_enhanced: form.ai_enhanced,
        ai_badge: non_empty(form.ai_badge),
        content: form.content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_counts_words_outside_tags() {
        assert_eq!(estimate_read_minutes(""), 1);
        assert_eq!(estimate_read_minutes("<p>short</p>"), 1);
        let words = vec!["word"; 500].join(" ");
        assert_eq!(estimate_read_minutes(&format!("<h2>T</h2><p>{words}</p>")), 3);
        let words = vec!["w"; 300].join(" ");
        assert_eq!(estimate_read_minutes(&words), 2);
        let words = vec!["w"; 299].join(" ");
        assert_eq!(estimate_read_minutes(&words), 1);
    }

    #[test]
    fn display_prefers_stored_value() {
        assert_eq!(display_read_time(Some("7 min"), ""), "7 min");
        assert_eq!(display_read_time(Some("  "), "<p>hi</p>"), "1 min read");
        assert_eq!(display_read_time(None, ""), "1 min read");
    }

    #[test]
    fn tags_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(parse_tags(" brand, ,design ,, ai "), vec!["brand", "design", "ai"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn excerpt_strips_markup_and_truncates() {
        assert_eq!(plain_excerpt("<p>Hello <b>world</b></p>", 100), "Hello world...");
        assert_eq!(plain_excerpt("abcdef", 3), "abc...");
        assert_eq!(plain_excerpt("", 10), "...");
    }

    #[test]
    fn form_becomes_draft_with_computed_read_time() {
        let draft = draft_from_form(BlogForm {
            title: "  Title ".into(),
            content: "<p>one two three</p>".into(),
            category: "Design".into(),
            image_url: Some("".into()),
            author: Some("Ava".into()),
            tags: Some("a, b".into()),
            ..Default::default()
        });
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.author.as_deref(), Some("Ava"));
        assert_eq!(draft.tags, vec!["a", "b"]);
        assert_eq!(draft.read_time.as_deref(), Some("1 min"));
    }

    #[test]
    fn explicit_read_time_is_kept() {
        let draft = draft_from_form(BlogForm {
            title: "T".into(),
            content: "x".into(),
            category: "C".into(),
            read_time: Some("12 min".into()),
            ..Default::default()
        });
        assert_eq!(draft.read_time.as_deref(), Some("12 min"));
    }
}
