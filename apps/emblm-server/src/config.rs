use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use jsonschema::{validator_for, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "configs/site.toml";

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on in-flight requests.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Outbound request timeout (assist calls).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_max_concurrency() -> usize {
    1024
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown store backend {other:?} (expected sqlite or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory holding `blogs.sqlite`.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            state_dir: default_state_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    /// Category TOML file; the built-in catalog is used when unset.
    #[serde(default)]
    pub categories_file: Option<PathBuf>,
    /// Served under `/images/categories`.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("public/images/categories")
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            categories_file: None,
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssistSection {
    #[serde(default = "default_assist_base_url")]
    pub base_url: String,
    #[serde(default = "default_assist_model")]
    pub model: String,
    /// Only read from `EMBLM_ASSIST_API_KEY`; never from the file.
    #[serde(skip)]
    #[schemars(skip)]
    pub api_key: Option<String>,
}

fn default_assist_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_assist_model() -> String {
    "gemini-1.5-flash".into()
}

impl Default for AssistSection {
    fn default() -> Self {
        Self {
            base_url: default_assist_base_url(),
            model: default_assist_model(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub assist: AssistSection,
}

static CONFIG_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema = schemars::schema_for!(SiteConfig);
    let schema_value = serde_json::to_value(&schema).expect("schema value");
    validator_for(&schema_value).expect("valid schema")
});

pub fn config_schema_json() -> serde_json::Value {
    let schema = schemars::schema_for!(SiteConfig);
    serde_json::to_value(&schema).expect("schema json")
}

/// Parse and schema-check a TOML document.
pub fn parse_config(content: &str) -> Result<SiteConfig> {
    let raw: toml::Value = toml::from_str(content)?;
    let json_value = serde_json::to_value(&raw)?;
    let validation_errors: Vec<_> = CONFIG_SCHEMA
        .iter_errors(&json_value)
        .map(|e| e.to_string())
        .collect();
    if !validation_errors.is_empty() {
        return Err(anyhow!(validation_errors.join(", ")));
    }
    let cfg: SiteConfig = toml::from_str(content)?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid config {}", path.display()))
}

/// `EMBLM_CONFIG` when set (must exist), else `configs/site.toml` when present,
/// else built-in defaults. Environment overrides are applied last.
pub fn discover() -> Result<SiteConfig> {
    let mut cfg = match std::env::var("EMBLM_CONFIG").ok().filter(|v| !v.is_empty()) {
        Some(path) => load_config(Path::new(&path))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => SiteConfig::default(),
    };
    cfg.apply_env()?;
    Ok(cfg)
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl SiteConfig {
    /// Layer `EMBLM_*` variables over the file values. HTTP bind/port/concurrency
    /// are resolved later by `bootstrap::http_config_from_env`.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(raw) = env_nonempty("EMBLM_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow!("invalid EMBLM_HTTP_TIMEOUT_SECS: {raw}"))?
                .max(1);
        }
        if let Some(raw) = env_nonempty("EMBLM_STORE") {
            self.store.backend = raw.parse()?;
        }
        if let Some(dir) = env_nonempty("EMBLM_STATE_DIR") {
            self.store.state_dir = PathBuf::from(dir);
        }
        if let Some(file) = env_nonempty("EMBLM_CATEGORIES_FILE") {
            self.catalog.categories_file = Some(PathBuf::from(file));
        }
        if let Some(dir) = env_nonempty("EMBLM_IMAGES_DIR") {
            self.catalog.images_dir = PathBuf::from(dir);
        }
        if let Some(url) = env_nonempty("EMBLM_ASSIST_BASE_URL") {
            self.assist.base_url = url;
        }
        if let Some(model) = env_nonempty("EMBLM_ASSIST_MODEL") {
            self.assist.model = model;
        }
        self.assist.api_key = env_nonempty("EMBLM_ASSIST_API_KEY");
        Ok(())
    }
}
