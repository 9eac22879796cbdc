//! # FDQ Client
//!
//! Query dispatch for the FDQ clinical data query client.
//!
//! Handles:
//! - The [`Backend`] trait the shells dispatch through
//! - [`RemoteBackend`]: HTTP POST to a configured query endpoint
//! - [`LocalSimulator`]: in-process keyword routing with a pacing delay
//! - Error mapping: connection failures, server-reported details, schema
//!   mismatches
//!
//! Uses `fdq-core` for the result model and configuration; no rendering
//! concerns live here.

#![warn(rust_2018_idioms)]

pub mod dispatcher;
pub mod error;
pub mod pacing;

pub use dispatcher::{backend_for, Backend, LocalSimulator, RemoteBackend};
pub use error::QueryError;
pub use pacing::{FixedPacing, NoPacing, Pacing, SIMULATED_LATENCY};
