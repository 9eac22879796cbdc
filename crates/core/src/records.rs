//! Clinical record and result-set types.
//!
//! This module defines the result model for query answers: three record
//! variants (patient, observation, condition) and the homogeneous result set
//! that carries them.
//!
//! Responsibilities:
//! - Define domain-level record types with an explicit kind set at construction
//! - Define the camelCase wire shape the backend uses for untagged records
//! - Classify untagged wire objects into tagged records at the boundary
//! - Enforce result-set homogeneity by construction
//!
//! Notes:
//! - The backend's `result` array is untagged JSON; classification there is
//!   structural (presence of `birthDate`, then `value`). A condition object
//!   that carries a `value` field will classify as an observation at this
//!   boundary. Inside the domain the kind is explicit and cannot drift.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Variant label for a homogeneous result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    /// Patient demographic records.
    Patients,
    /// Clinical observations (vitals, labs).
    Observations,
    /// Diagnosed conditions.
    Conditions,
}

impl ResultKind {
    /// The result-type label used in payloads and display.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Patients => "patients",
            ResultKind::Observations => "observations",
            ResultKind::Conditions => "conditions",
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient demographic record.
///
/// `age` is carried precomputed rather than derived from `birth_date`; the
/// backend owns that derivation and the filters operate on the carried value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A clinical observation record.
///
/// `value` stays a string: blood-pressure readings arrive as "120/80" and are
/// only parsed numerically at projection time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}

/// A diagnosed condition record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub onset_date: String,
}

/// A single record with its kind made explicit at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultRecord {
    Patient(PatientRecord),
    Observation(ObservationRecord),
    Condition(ConditionRecord),
}

impl ResultRecord {
    /// The result-set variant this record belongs to.
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultRecord::Patient(_) => ResultKind::Patients,
            ResultRecord::Observation(_) => ResultKind::Observations,
            ResultRecord::Condition(_) => ResultKind::Conditions,
        }
    }
}

/// An ordered result set, homogeneous in variant by construction.
///
/// A result set is replaced wholesale on each new query; there is no
/// incremental merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultSet {
    Patients(Vec<PatientRecord>),
    Observations(Vec<ObservationRecord>),
    Conditions(Vec<ConditionRecord>),
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("cannot classify an empty result array")]
    EmptyResult,
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
}

impl ResultSet {
    /// The variant label of this set.
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultSet::Patients(_) => ResultKind::Patients,
            ResultSet::Observations(_) => ResultKind::Observations,
            ResultSet::Conditions(_) => ResultKind::Conditions,
        }
    }

    /// Number of records in the set.
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Patients(v) => v.len(),
            ResultSet::Observations(v) => v.len(),
            ResultSet::Conditions(v) => v.len(),
        }
    }

    /// True when the set holds no records. Empty sets are a valid answer,
    /// rendered as an explicit "no data" state rather than an error.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a homogeneous set from an untagged wire array.
    ///
    /// The first record's structural classification picks the variant.
    /// Records that fail to classify or deserialise under that variant are
    /// logged and skipped, mirroring how unreadable stored records are
    /// tolerated elsewhere in the system.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyResult`] for an empty array, or the
    /// classification error of the first record.
    pub fn from_untagged(values: &[Value]) -> Result<Self, RecordError> {
        let first = values.first().ok_or(RecordError::EmptyResult)?;
        let kind = classify_untagged(first)?.kind();

        let mut set = match kind {
            ResultKind::Patients => ResultSet::Patients(Vec::with_capacity(values.len())),
            ResultKind::Observations => ResultSet::Observations(Vec::with_capacity(values.len())),
            ResultKind::Conditions => ResultSet::Conditions(Vec::with_capacity(values.len())),
        };

        for value in values {
            match (classify_untagged(value), &mut set) {
                (Ok(ResultRecord::Patient(r)), ResultSet::Patients(v)) => v.push(r),
                (Ok(ResultRecord::Observation(r)), ResultSet::Observations(v)) => v.push(r),
                (Ok(ResultRecord::Condition(r)), ResultSet::Conditions(v)) => v.push(r),
                (Ok(other), _) => {
                    tracing::warn!(
                        expected = %kind,
                        got = %other.kind(),
                        "skipping record with mismatched variant in result array"
                    );
                }
                (Err(err), _) => {
                    tracing::warn!(%err, "skipping unreadable record in result array");
                }
            }
        }

        Ok(set)
    }
}

// ============================================================================
// Wire-boundary classification
// ============================================================================

/// Classify one untagged wire object into a tagged record.
///
/// Presence of `birthDate` classifies the object as a patient, else presence
/// of `value` as an observation, otherwise as a condition.
pub fn classify_untagged(value: &Value) -> Result<ResultRecord, RecordError> {
    let object = value.as_object().ok_or(RecordError::NotAnObject)?;

    if object.contains_key("birthDate") {
        decode_record::<PatientRecord>(value).map(ResultRecord::Patient)
    } else if object.contains_key("value") {
        decode_record::<ObservationRecord>(value).map(ResultRecord::Observation)
    } else {
        decode_record::<ConditionRecord>(value).map(ResultRecord::Condition)
    }
}

/// Deserialise a wire object, surfacing the path to any failing field.
fn decode_record<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, RecordError> {
    serde_path_to_error::deserialize(value.clone()).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        RecordError::Schema {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_birth_date_as_patient() {
        let record = classify_untagged(&json!({
            "id": "PAT001",
            "name": "John Smith",
            "gender": "Male",
            "birthDate": "1979-03-12",
            "age": 47
        }))
        .expect("classify patient");

        assert_eq!(record.kind(), ResultKind::Patients);
        match record {
            ResultRecord::Patient(p) => {
                assert_eq!(p.birth_date, "1979-03-12");
                assert!(p.address.is_none());
            }
            other => panic!("expected patient, got {other:?}"),
        }
    }

    #[test]
    fn classifies_value_as_observation() {
        let record = classify_untagged(&json!({
            "id": "OBS001",
            "patientId": "PAT001",
            "type": "Blood Pressure",
            "value": "128/82",
            "unit": "mmHg",
            "date": "2026-07-18",
            "status": "final"
        }))
        .expect("classify observation");

        match record {
            ResultRecord::Observation(o) => {
                assert_eq!(o.kind, "Blood Pressure");
                assert_eq!(o.value, "128/82");
            }
            other => panic!("expected observation, got {other:?}"),
        }
    }

    #[test]
    fn classifies_remainder_as_condition() {
        let record = classify_untagged(&json!({
            "id": "COND001",
            "patientId": "PAT001",
            "code": "E11.9",
            "description": "Type 2 Diabetes Mellitus",
            "severity": "Moderate",
            "onsetDate": "2019-04-02"
        }))
        .expect("classify condition");

        assert_eq!(record.kind(), ResultKind::Conditions);
    }

    #[test]
    fn condition_carrying_value_field_classifies_as_observation() {
        // Structural classification cannot tell these apart: the `value` key
        // wins before the condition shape is ever considered.
        let record = classify_untagged(&json!({
            "id": "COND009",
            "patientId": "PAT001",
            "code": "I10",
            "value": "incidental",
            "severity": "Mild"
        }))
        .expect("classify");

        assert_eq!(record.kind(), ResultKind::Observations);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record = classify_untagged(&json!({ "id": "COND002" })).expect("classify");
        match record {
            ResultRecord::Condition(c) => {
                assert_eq!(c.id, "COND002");
                assert_eq!(c.description, "");
                assert_eq!(c.severity, "");
            }
            other => panic!("expected condition, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_object_records() {
        assert!(matches!(
            classify_untagged(&json!("PAT001")),
            Err(RecordError::NotAnObject)
        ));
    }

    #[test]
    fn builds_homogeneous_set_from_untagged_array() {
        let values = vec![
            json!({ "id": "PAT001", "birthDate": "1979-03-12", "age": 47 }),
            json!({ "id": "PAT002", "birthDate": "1992-06-24", "age": 34 }),
        ];

        let set = ResultSet::from_untagged(&values).expect("build set");
        assert_eq!(set.kind(), ResultKind::Patients);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn skips_records_of_mismatched_variant() {
        let values = vec![
            json!({ "id": "PAT001", "birthDate": "1979-03-12", "age": 47 }),
            json!({ "id": "OBS001", "value": "72" }),
            json!({ "id": "PAT003", "birthDate": "1967-11-03", "age": 58 }),
        ];

        let set = ResultSet::from_untagged(&values).expect("build set");
        assert_eq!(set.kind(), ResultKind::Patients);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_array_cannot_be_classified() {
        assert!(matches!(
            ResultSet::from_untagged(&[]),
            Err(RecordError::EmptyResult)
        ));
    }

    #[test]
    fn patient_serde_uses_camel_case_wire_names() {
        let patient = PatientRecord {
            id: "PAT002".into(),
            name: "Emily Johnson".into(),
            gender: "Female".into(),
            birth_date: "1992-06-24".into(),
            age: 34,
            address: Some("17 Birch Lane, Springfield".into()),
            phone: None,
        };

        let json = serde_json::to_value(&patient).expect("serialize");
        assert_eq!(json["birthDate"], "1992-06-24");
        assert!(json.get("phone").is_none());

        let back: PatientRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, patient);
    }
}
