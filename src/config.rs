//! Client configuration
//!
//! A search client is described in YAML:
//!
//! ```yaml
//! base_url: "https://{{ vars.account }}.backend.example.com/services"
//! endpoints:
//!   search: /search
//!   search_more: /searchMoreWithId
//! auth:
//!   type: bearer
//!   token: "{{ env.SEARCH_TOKEN }}"
//! http:
//!   max_retries: 5
//!   rate_limit:
//!     requests_per_second: 4
//! search:
//!   page_size: 200
//! ```
//!
//! Template expressions are rendered before the document is deserialized.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::search::DEFAULT_PAGE_SIZE;
use crate::template::{render_value, TemplateContext};
use crate::types::{BackoffType, JsonValue, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl ClientConfig {
    /// Load and validate a config file, rendering templates against the
    /// process environment and `ctx` vars
    pub fn load(path: impl AsRef<Path>, ctx: &TemplateContext) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml(&content, ctx)
    }

    /// Parse and validate a config from a YAML string
    pub fn from_yaml(yaml: &str, ctx: &TemplateContext) -> Result<Self> {
        let raw: JsonValue = serde_yaml::from_str(yaml)?;
        let rendered = render_value(&raw, ctx)?;
        let config: Self = serde_json::from_value(rendered)
            .map_err(|e| Error::config(format!("Failed to parse client config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the values deserialization cannot
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.search.page_size == 0 {
            return Err(Error::invalid_value(
                "search.page_size",
                "page size must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Full URL of the initial search endpoint
    pub fn search_url(&self) -> String {
        join_url(&self.base_url, &self.endpoints.search)
    }

    /// Full URL of the follow-up page endpoint
    pub fn search_more_url(&self) -> String {
        join_url(&self.base_url, &self.endpoints.search_more)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ============================================================================
// Endpoints
// ============================================================================

/// Paths of the two search operations, relative to `base_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_search_path")]
    pub search: String,

    #[serde(default = "default_search_more_path")]
    pub search_more: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            search: default_search_path(),
            search_more: default_search_more_path(),
        }
    }
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_search_more_path() -> String {
    "/searchMoreWithId".to_string()
}

// ============================================================================
// HTTP Configuration
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Client-side throttle, off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: None,
            headers: StringMap::new(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Build the transport config from these settings
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .connect_timeout(Duration::from_secs(self.connect_timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.retry_backoff.backoff_type,
                Duration::from_millis(self.retry_backoff.initial_ms),
                Duration::from_millis(self.retry_backoff.max_ms),
            );

        if let Some(rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    30_000
}

// ============================================================================
// Search Preferences
// ============================================================================

/// Preferences sent with every paged search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Ask the backend for body fields only, skipping sublists
    #[serde(default = "default_true")]
    pub body_fields_only: bool,

    #[serde(default = "default_true")]
    pub return_search_columns: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            body_fields_only: true,
            return_search_columns: true,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}
