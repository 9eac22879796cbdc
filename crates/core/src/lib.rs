//! # FDQ Core
//!
//! Core business logic for the FDQ clinical data query client.
//!
//! This crate contains pure data operations, independent of any transport or
//! terminal front end:
//! - The result model: tagged clinical records and homogeneous result sets
//! - The backend response envelope and its strict decoder
//! - Client-side filtering of a loaded result set
//! - View projections (table, chart, cards) derived per render
//! - The session state machine driving the single-screen shell
//! - The built-in simulator dataset
//!
//! **No transport concerns**: HTTP dispatch, pacing delays, or terminal
//! rendering belong in `fdq-client`, `fdq-cli`, and `fdq-tui`.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod envelope;
pub mod filter;
pub mod projection;
pub mod records;
pub mod session;

pub use config::{BackendMode, ClientConfig, ConfigError};
pub use envelope::{ApiEnvelope, DecodeError};
pub use filter::FilterCriteria;
pub use records::{ConditionRecord, ObservationRecord, PatientRecord, ResultKind, ResultSet};
pub use session::{QueryOutcome, Session, SessionState};
