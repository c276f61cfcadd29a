use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// RFC7807-style error payload used at service edges.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ProblemDetails {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            r#type: "about:blank".into(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// -------- Blog posts --------

/// Author-supplied fields of a post. Ids and timestamps are assigned by the store.
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub title: String,
    /// HTML-bearing body text.
    pub content: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_badge: Option<String>,
}

/// A stored post as returned by the blog store.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    #[serde(flatten)]
    pub draft: BlogDraft,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn content(&self) -> &str {
        &self.draft.content
    }
}

/// Admin form payload; `tags` arrives as the comma-separated text field.
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default)]
    pub ai_badge: Option<String>,
}

// -------- Content assist --------

#[derive(Debug, Serialize, Deserialize, Clone, Copy, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    Generate,
    Polish,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct AssistRequest {
    pub mode: AssistMode,
    pub content: String,
    /// Custom polish instruction; ignored for `generate`.
    #[serde(default)]
    pub instruction: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistResponse {
    pub content: String,
    pub ai_enhanced: bool,
    pub ai_badge: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn problem_skips_empty_fields() {
        let p = ProblemDetails::new(404, "Not Found");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            json!({"type": "about:blank", "title": "Not Found", "status": 404})
        );
    }

    #[test]
    fn post_flattens_draft_fields() {
        let post = BlogPost {
            id: "abc".into(),
            draft: BlogDraft {
                title: "Hello".into(),
                content: "<p>hi</p>".into(),
                category: "Design".into(),
                image_url: Some("https://img.example/x.png".into()),
                tags: vec!["a".into()],
                ..Default::default()
            },
            created_at: DateTime::parse_from_rfc3339("2025-01-15T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: None,
        };
        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v["id"], "abc");
        assert_eq!(v["title"], "Hello");
        assert_eq!(v["imageUrl"], "https://img.example/x.png");
        assert!(v.get("updatedAt").is_none());
        assert_eq!(v["aiEnhanced"], false);
    }

    #[test]
    fn assist_mode_is_lowercase_on_the_wire() {
        let req: AssistRequest =
            serde_json::from_value(json!({"mode": "polish", "content": "x"})).unwrap();
        assert_eq!(req.mode, AssistMode::Polish);
        assert!(req.instruction.is_none());
    }
}
