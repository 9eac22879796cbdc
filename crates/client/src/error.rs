//! Dispatch error types.
//!
//! Every error here is recoverable at the call site: the shell renders it in
//! the error banner and the next successful dispatch clears it. There is no
//! retry policy. Empty results are not errors and never reach this type.

/// Generic failure text used when a non-2xx response carries no detail.
pub const GENERIC_FAILURE: &str = "Failed to fetch data";

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The backend host could not be reached at all. The message carries
    /// remediation guidance, mirroring what the banner should display.
    #[error(
        "Cannot connect to the backend API. Please ensure:\n\
         1. The backend is running at {url}\n\
         2. CORS is properly configured on the backend"
    )]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status. `detail` is the
    /// server-reported message when present, or [`GENERIC_FAILURE`].
    #[error("{detail}")]
    Backend { detail: String },

    /// The backend answered 2xx but the body did not match the envelope
    /// schema.
    #[error(transparent)]
    Decode(#[from] fdq_core::envelope::DecodeError),

    /// The request could not be sent for a reason other than reachability.
    #[error("failed to call backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read backend response: {0}")]
    Body(#[source] reqwest::Error),
}
