//! Backend response envelope.
//!
//! This module defines the full structured payload a real backend returns for
//! a query: the raw result records, precomputed table/chart/card projections,
//! a natural-language answer, and timing metadata. It is the wire twin of the
//! domain-side [`crate::records`] model; decoding failures surface a
//! best-effort JSON path to the offending field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full backend payload for one query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// The query as echoed back by the backend.
    pub query: String,

    /// The retrieval code the backend generated for this query.
    pub generated_code: String,

    /// Raw, untagged result records.
    #[serde(default)]
    pub result: Vec<Value>,

    /// Precomputed presentation data.
    pub data: ApiData,

    /// Natural-language answer to the query.
    pub natural_language_response: String,

    /// Backend execution time, in seconds.
    pub execution_time: f64,
}

/// Presentation sections of the payload. All sections are optional; absent
/// sections simply do not render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiData {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub table: Option<ApiTable>,

    #[serde(default)]
    pub chart: Option<ApiChart>,

    #[serde(default)]
    pub cards: Option<Vec<ApiCard>>,
}

/// Server-side table projection: rows are objects keyed by column name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiTable {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub total: u64,
}

/// Server-side chart projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ApiDataset>,
}

/// One chart series. Only the first series is ever projected client-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiDataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// One summary card entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiCard {
    pub label: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Error body carried by non-2xx backend responses.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
#[error("response schema mismatch at {path}: {message}")]
pub struct DecodeError {
    /// JSON path to the field that failed to decode, or `<root>`.
    pub path: String,
    pub message: String,
}

impl ApiEnvelope {
    /// Decode a backend response body.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] carrying the JSON path of the first field that
    /// does not match the envelope schema.
    pub fn decode(body: &str) -> Result<Self, DecodeError> {
        let mut deserializer = serde_json::Deserializer::from_str(body);

        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() {
                "<root>".to_string()
            } else {
                path
            };
            DecodeError {
                path,
                message: err.into_inner().to_string(),
            }
        })
    }
}
