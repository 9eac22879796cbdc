//! Query dispatch against a local or remote backend.
//!
//! Both backends implement one trait so the shells are indifferent to where
//! answers come from. A dispatch replaces the session's result wholesale on
//! completion; that side effect is owned by the session reducer, not here.

use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use fdq_core::config::{BackendMode, ClientConfig};
use fdq_core::dataset;
use fdq_core::envelope::{ApiEnvelope, ApiErrorBody};
use fdq_core::session::QueryOutcome;
use fdq_types::QueryText;

use crate::error::{QueryError, GENERIC_FAILURE};
use crate::pacing::{FixedPacing, NoPacing, Pacing};

/// A backend that can answer free-text queries.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn dispatch(&self, query: &QueryText) -> Result<QueryOutcome, QueryError>;

    /// Short label for logging and the screen header.
    fn describe(&self) -> String;
}

/// Build the backend selected by the configuration.
pub fn backend_for(config: &ClientConfig) -> Result<Box<dyn Backend>, QueryError> {
    match config.mode() {
        BackendMode::Local => Ok(Box::new(LocalSimulator::new())),
        BackendMode::Remote => Ok(Box::new(RemoteBackend::new(config)?)),
    }
}

// ============================================================================
// Local simulator
// ============================================================================

/// In-process backend: keyword routing over the built-in dataset, paced so
/// the loading state is visible.
pub struct LocalSimulator {
    pacing: Box<dyn Pacing>,
}

impl LocalSimulator {
    pub fn new() -> Self {
        Self::with_pacing(Box::new(FixedPacing::default()))
    }

    /// A simulator with no pacing delay, for one-shot and test use.
    pub fn unpaced() -> Self {
        Self::with_pacing(Box::new(NoPacing))
    }

    pub fn with_pacing(pacing: Box<dyn Pacing>) -> Self {
        Self { pacing }
    }
}

impl Default for LocalSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for LocalSimulator {
    async fn dispatch(&self, query: &QueryText) -> Result<QueryOutcome, QueryError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, backend = "local");

        async {
            self.pacing.pause().await;
            let set = dataset::respond(query.as_str());
            tracing::info!(records = set.len(), result_type = %set.kind(), "dispatch complete");
            Ok(QueryOutcome::Simulated(set))
        }
        .instrument(span)
        .await
    }

    fn describe(&self) -> String {
        "local simulator".to_string()
    }
}

// ============================================================================
// Remote backend
// ============================================================================

/// Wire shape of the query request body.
#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// HTTP backend at a configured base URL.
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
    endpoint: String,
}

impl RemoteBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(QueryError::Transport)?;

        Ok(Self {
            http,
            base_url: config.api_base_url().to_string(),
            endpoint: config.query_endpoint(),
        })
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn dispatch(&self, query: &QueryText) -> Result<QueryOutcome, QueryError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, backend = "remote");

        async {
            let started = Instant::now();

            let response = self
                .http
                .post(&self.endpoint)
                .json(&QueryRequest {
                    query: query.as_str(),
                })
                .send()
                .await
                .map_err(|err| {
                    if err.is_connect() || err.is_timeout() {
                        QueryError::Unreachable {
                            url: self.base_url.clone(),
                            source: err,
                        }
                    } else {
                        QueryError::Transport(err)
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let detail = response
                    .json::<ApiErrorBody>()
                    .await
                    .map(|body| body.detail)
                    .unwrap_or_else(|_| GENERIC_FAILURE.to_string());
                tracing::warn!(%status, %detail, "backend reported failure");
                return Err(QueryError::Backend { detail });
            }

            let body = response.text().await.map_err(QueryError::Body)?;
            let envelope = ApiEnvelope::decode(&body)?;

            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                records = envelope.data.count.unwrap_or(envelope.result.len() as u64),
                "dispatch complete"
            );
            Ok(QueryOutcome::Api(envelope))
        }
        .instrument(span)
        .await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
