//! Record source boundary.
//!
//! Fetches raw point summaries and nation totals from the points REST
//! backend. Each call is a single attempt: no retry, no caching. Failures
//! surface as [`FetchError`] and never as partial data.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::models::{Nation, ScopeId, TopPerformers};

/// Errors that can occur while loading from the backend.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response from {endpoint}: {detail}")]
    UnexpectedShape { endpoint: String, detail: String },
}

/// Anything that can supply raw point records and nations.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Raw point-summary records for one organizational address, in backend order.
    async fn fetch_point_records(&self, scope: ScopeId) -> Result<Vec<Value>, FetchError>;

    /// All nations with their backend-computed totals.
    async fn fetch_nations(&self) -> Result<Vec<Nation>, FetchError>;

    /// Week, month and year leaders the backend computes for an address.
    async fn fetch_top_performers(&self, scope: ScopeId) -> Result<TopPerformers, FetchError>;
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:2025`
    pub base_url: Url,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:2025").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
            user_agent: format!("nation-points/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TryFrom<&ApiConfig> for ClientConfig {
    type Error = FetchError;

    fn try_from(config: &ApiConfig) -> Result<Self, Self::Error> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(config.timeout_seconds),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// REST client for the points backend.
pub struct PointsClient {
    client: Client,
    config: ClientConfig,
}

impl PointsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("nation-points")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    /// URL of the point summary for an address.
    fn summary_url(&self, scope: ScopeId) -> Result<Url, FetchError> {
        self.endpoint(&format!("api/points/summary/address/{}", scope))
    }

    fn top_performers_url(&self, scope: ScopeId) -> Result<Url, FetchError> {
        self.endpoint(&format!("api/points/top-performance/address/{}", scope))
    }

    fn nations_url(&self) -> Result<Url, FetchError> {
        self.endpoint("api/nations")
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let mut base = self.config.base_url.clone();
        // Keep any path prefix on the base URL when joining.
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", base, path, e)))
    }

    /// GET a URL and decode the body as JSON.
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Require a JSON array body.
fn expect_array(endpoint: &Url, body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(items) => Ok(items),
        other => Err(FetchError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            detail: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl RecordSource for PointsClient {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn fetch_point_records(&self, scope: ScopeId) -> Result<Vec<Value>, FetchError> {
        let url = self.summary_url(scope)?;
        let body = self.get_json(&url).await?;
        let records = expect_array(&url, body)?;
        info!("Fetched {} point records for address {}", records.len(), scope);
        Ok(records)
    }

    async fn fetch_nations(&self) -> Result<Vec<Nation>, FetchError> {
        let url = self.nations_url()?;
        let body = self.get_json(&url).await?;
        let items = expect_array(&url, body)?;
        let nations = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Nation>, _>>()?;
        info!("Fetched {} nations", nations.len());
        Ok(nations)
    }

    async fn fetch_top_performers(&self, scope: ScopeId) -> Result<TopPerformers, FetchError> {
        let url = self.top_performers_url(scope)?;
        match self.get_json(&url).await? {
            Value::Null => Ok(TopPerformers::default()),
            body @ Value::Object(_) => Ok(serde_json::from_value(body)?),
            other => Err(FetchError::UnexpectedShape {
                endpoint: url.to_string(),
                detail: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}
