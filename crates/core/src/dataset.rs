//! Built-in simulator dataset.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted. The dataset stands in for a real query backend during
//! local runs and tests: a query is routed to one of three record sets by
//! keyword, falling back to a single hard-coded patient when nothing matches.
//!
//! Routing is deliberately naive. Keyword sets are checked in a fixed
//! precedence order (patients, then vitals, then conditions) and the first
//! match wins, so "find blood pressure readings" routes to patients via
//! "find". The ordering is part of the observed behaviour and is preserved
//! as-is.

use crate::constants::{CONDITION_KEYWORDS, PATIENT_KEYWORDS, VITALS_KEYWORDS};
use crate::records::{ConditionRecord, ObservationRecord, PatientRecord, ResultSet};

/// The three built-in patient records.
pub fn patients() -> Vec<PatientRecord> {
    vec![
        PatientRecord {
            id: "PAT001".into(),
            name: "John Smith".into(),
            gender: "Male".into(),
            birth_date: "1979-03-12".into(),
            age: 47,
            address: Some("42 Cedar Avenue, Springfield".into()),
            phone: Some("555-0142".into()),
        },
        PatientRecord {
            id: "PAT002".into(),
            name: "Emily Johnson".into(),
            gender: "Female".into(),
            birth_date: "1992-06-24".into(),
            age: 34,
            address: Some("17 Birch Lane, Springfield".into()),
            phone: Some("555-0178".into()),
        },
        PatientRecord {
            id: "PAT003".into(),
            name: "Michael Brown".into(),
            gender: "Male".into(),
            birth_date: "1967-11-03".into(),
            age: 58,
            address: Some("8 Willow Court, Springfield".into()),
            phone: None,
        },
    ]
}

/// The built-in vital-sign observations, each linked to a patient id.
pub fn observations() -> Vec<ObservationRecord> {
    vec![
        ObservationRecord {
            id: "OBS001".into(),
            patient_id: "PAT001".into(),
            kind: "Blood Pressure".into(),
            value: "128/82".into(),
            unit: Some("mmHg".into()),
            date: "2026-07-18".into(),
            status: "final".into(),
        },
        ObservationRecord {
            id: "OBS002".into(),
            patient_id: "PAT002".into(),
            kind: "Blood Pressure".into(),
            value: "118/76".into(),
            unit: Some("mmHg".into()),
            date: "2026-07-21".into(),
            status: "final".into(),
        },
        ObservationRecord {
            id: "OBS003".into(),
            patient_id: "PAT001".into(),
            kind: "Heart Rate".into(),
            value: "72".into(),
            unit: Some("bpm".into()),
            date: "2026-07-18".into(),
            status: "final".into(),
        },
        ObservationRecord {
            id: "OBS004".into(),
            patient_id: "PAT003".into(),
            kind: "Glucose".into(),
            value: "104".into(),
            unit: Some("mg/dL".into()),
            date: "2026-07-25".into(),
            status: "preliminary".into(),
        },
    ]
}

/// The three built-in condition records.
pub fn conditions() -> Vec<ConditionRecord> {
    vec![
        ConditionRecord {
            id: "COND001".into(),
            patient_id: "PAT001".into(),
            code: "E11.9".into(),
            description: "Type 2 Diabetes Mellitus".into(),
            severity: "Moderate".into(),
            onset_date: "2019-04-02".into(),
        },
        ConditionRecord {
            id: "COND002".into(),
            patient_id: "PAT002".into(),
            code: "J45.909".into(),
            description: "Asthma".into(),
            severity: "Severe".into(),
            onset_date: "2008-09-15".into(),
        },
        ConditionRecord {
            id: "COND003".into(),
            patient_id: "PAT003".into(),
            code: "I10".into(),
            description: "Essential Hypertension".into(),
            severity: "Severe".into(),
            onset_date: "2021-01-30".into(),
        },
    ]
}

/// The record returned when no keyword matches.
pub fn fallback_patient() -> PatientRecord {
    patients().swap_remove(0)
}

/// Route a query to a result set by keyword.
///
/// The query is lower-cased and tested for substring membership against the
/// keyword sets in precedence order; the first matching set answers.
pub fn respond(query: &str) -> ResultSet {
    let needle = query.to_lowercase();
    let matches_any = |keywords: &[&str]| keywords.iter().any(|k| needle.contains(k));

    if matches_any(&PATIENT_KEYWORDS) {
        ResultSet::Patients(patients())
    } else if matches_any(&VITALS_KEYWORDS) {
        ResultSet::Observations(observations())
    } else if matches_any(&CONDITION_KEYWORDS) {
        ResultSet::Conditions(conditions())
    } else {
        ResultSet::Patients(vec![fallback_patient()])
    }
}
