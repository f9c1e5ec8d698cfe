//! Search backend access.
//!
//! [`SearchBackend`] is the seam between the photo search service and the
//! index. [`ElasticsearchClient`] talks to Elasticsearch over its REST API
//! using a shared `ureq` agent; the blocking call runs on tokio's blocking
//! pool so concurrent searches do not stall the async workers.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::config::ElasticsearchConfig;
use crate::search_query::SearchRequest;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("search backend request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("search backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed search backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search backend task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total` is an object since Elasticsearch 7 and a bare number before.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Object { value } | TotalHits::Count(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, BackendError>;

    /// Cheap liveness probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), BackendError>;
}

#[derive(Clone)]
pub struct ElasticsearchClient {
    agent: Agent,
    base_url: String,
    authorization: Option<String>,
}

impl ElasticsearchClient {
    pub fn new(config: &ElasticsearchConfig) -> Self {
        let tls = TlsConfig::builder()
            .disable_verification(!config.verify_certs)
            .build();

        let agent: Agent = Agent::config_builder()
            .tls_config(tls)
            .timeout_global(config.timeout)
            .http_status_as_error(false)
            .build()
            .into();

        let authorization = config
            .username
            .as_deref()
            .map(|user| basic_auth(user, &config.password));

        Self {
            agent,
            base_url: config.host.trim_end_matches('/').to_string(),
            authorization,
        }
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }

    fn execute_search(&self, url: &str, body: &SearchRequest) -> Result<String, BackendError> {
        let mut request = self.agent.post(url);
        if let Some(auth) = &self.authorization {
            request = request.header("Authorization", auth.as_str());
        }

        let mut response = request.send_json(body)?;
        let status = response.status();
        let text = response.body_mut().read_to_string()?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn execute_ping(&self) -> Result<(), BackendError> {
        let mut request = self.agent.get(self.base_url.as_str());
        if let Some(auth) = &self.authorization {
            request = request.header("Authorization", auth.as_str());
        }

        let mut response = request.call()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

pub fn decode_search_response(body: &str) -> Result<SearchResponse, BackendError> {
    Ok(serde_json::from_str(body)?)
}

fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, BackendError> {
        let client = self.clone();
        let url = self.search_url(index);
        let body = request.clone();

        let text = tokio::task::spawn_blocking(move || client.execute_search(&url, &body)).await??;
        decode_search_response(&text)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.execute_ping()).await?
    }
}
