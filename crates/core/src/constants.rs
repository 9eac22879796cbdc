//! Constants used throughout the FDQ core crate.
//!
//! This module contains the keyword sets, column lists, and default values
//! shared across the dispatcher, projector, and configuration to ensure
//! consistency across the codebase.

/// Default backend base URL when no explicit URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path of the query endpoint relative to the backend base URL.
pub const QUERY_ENDPOINT_PATH: &str = "/query";

/// Keywords that route a query to the patients dataset. Checked first.
pub const PATIENT_KEYWORDS: [&str; 3] = ["patient", "find", "who"];

/// Keywords that route a query to the observations dataset. Checked second.
pub const VITALS_KEYWORDS: [&str; 3] = ["blood pressure", "observation", "vital"];

/// Keywords that route a query to the conditions dataset. Checked last.
pub const CONDITION_KEYWORDS: [&str; 3] = ["condition", "diagnosis", "disease"];

/// Table columns for a patient result set.
pub const PATIENT_COLUMNS: [&str; 7] =
    ["ID", "Name", "Gender", "Age", "Birth Date", "Address", "Phone"];

/// Table columns for an observation result set.
pub const OBSERVATION_COLUMNS: [&str; 7] =
    ["ID", "Patient", "Type", "Value", "Unit", "Date", "Status"];

/// Table columns for a condition result set.
pub const CONDITION_COLUMNS: [&str; 6] =
    ["ID", "Patient", "Code", "Description", "Severity", "Onset Date"];

/// Chart labels for the fixed patient age bands, in display order.
pub const AGE_BAND_LABELS: [&str; 4] = ["<30", "30-39", "40-49", "50+"];
