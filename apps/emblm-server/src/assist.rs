//! AI writing assist for the admin editor: draft generation and polishing
//! through the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use emblm_protocol::{AssistMode, AssistRequest, AssistResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLISH_INSTRUCTION: &str =
    "Polish grammar, improve clarity, and keep formatting.";

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("content assist is not configured")]
    Disabled,
    #[error("content is required")]
    EmptyContent,
    #[error("assist request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("assist upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("assist upstream returned no text")]
    EmptyReply,
}

#[async_trait]
pub trait ContentAssist: Send + Sync {
    fn enabled(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &str) -> Result<String, AssistError>;
}

/// Used when no API key is configured.
pub struct DisabledAssist;

#[async_trait]
impl ContentAssist for DisabledAssist {
    fn enabled(&self) -> bool {
        false
    }

    async fn complete(&self, _prompt: &str) -> Result<String, AssistError> {
        Err(AssistError::Disabled)
    }
}

pub struct GeminiAssist {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

pub(crate) fn generate_endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// reqwest errors print the request URL; keep it out of logs and problem bodies.
fn redact(err: reqwest::Error) -> AssistError {
    AssistError::Http(err.without_url())
}

impl GeminiAssist {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, AssistError> {
        Ok(Self {
            client: crate::http_client::client_with_timeout(timeout)?,
            endpoint: generate_endpoint(base_url, model),
            api_key,
        })
    }
}

#[async_trait]
impl ContentAssist for GeminiAssist {
    async fn complete(&self, prompt: &str) -> Result<String, AssistError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(redact)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }
        let parsed: GenerateResponse = resp.json().await.map_err(redact)?;
        parsed.text().ok_or(AssistError::EmptyReply)
    }
}

pub fn build_prompt(mode: AssistMode, content: &str, instruction: Option<&str>) -> String {
    match mode {
        AssistMode::Generate => format!(
            "Convert the following blog draft into SEO-friendly HTML with headings, paragraphs, and proper formatting. Use English. Do not write any comments. Do not include <html> or <body>, only valid HTML:\n\n{content}"
        ),
        AssistMode::Polish => {
            let instruction = instruction
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_POLISH_INSTRUCTION);
            format!(
                "{instruction}\n\nHere is the blog content:\n\n{content}\n\nUse English. Do not write any comments or anything extra."
            )
        }
    }
}

pub fn badge(mode: AssistMode) -> &'static str {
    match mode {
        AssistMode::Generate => "Gemini Draft (SEO)",
        AssistMode::Polish => "Gemini Polished",
    }
}

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```html\n?").expect("fence regex"));
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").expect("fence regex"));

/// Strip markdown code fences models like to wrap HTML in.
pub fn clean_ai_output(text: &str) -> String {
    let without_open = FENCE_OPEN.replace_all(text, "");
    FENCE_CLOSE.replace(&without_open, "").trim().to_string()
}

/// Validate, prompt, call the model, and tidy the reply.
pub async fn run(
    assist: &dyn ContentAssist,
    req: &AssistRequest,
) -> Result<AssistResponse, AssistError> {
    if req.content.trim().is_empty() {
        return Err(AssistError::EmptyContent);
    }
    if !assist.enabled() {
        return Err(AssistError::Disabled);
    }
    let prompt = build_prompt(req.mode, &req.content, req.instruction.as_deref());
    let raw = assist.complete(&prompt).await?;
    Ok(AssistResponse {
        content: clean_ai_output(&raw),
        ai_enhanced: true,
        ai_badge: badge(req.mode).to_string(),
    })
}
