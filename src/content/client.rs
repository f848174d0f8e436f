//! HTTP client for the content query API

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::de::items_from_value;
use super::post::Post;
use super::query::PostQuery;
use crate::config::ContentConfig;
use crate::error::ContentError;
use crate::helpers::encode_uri_component;

/// Longest error body kept in a `ContentError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Envelope of every query response
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    /// Missing or `null` when nothing matched a single-document query
    pub result: Option<T>,
    /// Server-side query time in milliseconds
    pub ms: Option<u64>,
}

/// Read-only client for one project and dataset
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    endpoint: String,
}

impl ContentClient {
    /// Create a client from the content configuration
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("sanity-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = format!(
            "{}/{}/data/query/{}",
            config.origin(),
            config.version_segment(),
            config.dataset
        );

        Ok(Self { http, endpoint })
    }

    /// Full GET URL for a GROQ expression
    pub fn query_url(&self, groq: &str) -> String {
        format!("{}?query={}", self.endpoint, encode_uri_component(groq))
    }

    /// Run a GROQ expression and decode its `result`
    pub async fn fetch<T: DeserializeOwned>(&self, groq: &str) -> Result<Option<T>, ContentError> {
        let url = self.query_url(groq);
        tracing::debug!("Querying content host: {}", groq);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(ContentError::Status { status, body });
        }

        let decoded: QueryResponse<T> = serde_json::from_slice(&bytes)?;
        if let Some(ms) = decoded.ms {
            tracing::debug!("Query answered in {} ms", ms);
        }

        Ok(decoded.result)
    }

    /// Run a post query; an empty, `null` or missing result is an empty list
    ///
    /// Documents that do not decode as posts are skipped so one bad record
    /// does not hide the others.
    pub async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, ContentError> {
        let result = self
            .fetch::<Value>(&query.to_groq())
            .await?
            .unwrap_or(Value::Null);
        Ok(query.shape(items_from_value(result)))
    }
}
