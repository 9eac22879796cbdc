//! View projections over the currently visible result set.
//!
//! Three independent projections — table, chart, cards — are derived on
//! demand from whatever set is visible (filtered if criteria are active,
//! else full). None of them hold state; every render recomputes from
//! scratch. The carrier types here are plain data so any front end can
//! render them.

use serde::Serialize;
use serde_json::Value;

use crate::constants::{
    AGE_BAND_LABELS, CONDITION_COLUMNS, OBSERVATION_COLUMNS, PATIENT_COLUMNS,
};
use crate::envelope::{ApiCard, ApiChart, ApiTable};
use crate::records::ResultSet;

// ============================================================================
// Table
// ============================================================================

/// A rendered table: fixed columns, one row per visible record, cells
/// coerced to display strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
}

/// Project a result set into a table.
///
/// The column list is fixed per variant; missing optional values render as
/// the empty string. The row count always equals the visible record count.
pub fn table(results: &ResultSet) -> TableView {
    match results {
        ResultSet::Patients(patients) => TableView {
            columns: PATIENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: patients
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.name.clone(),
                        p.gender.clone(),
                        p.age.to_string(),
                        p.birth_date.clone(),
                        p.address.clone().unwrap_or_default(),
                        p.phone.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
            total: patients.len(),
        },
        ResultSet::Observations(observations) => TableView {
            columns: OBSERVATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: observations
                .iter()
                .map(|o| {
                    vec![
                        o.id.clone(),
                        o.patient_id.clone(),
                        o.kind.clone(),
                        o.value.clone(),
                        o.unit.clone().unwrap_or_default(),
                        o.date.clone(),
                        o.status.clone(),
                    ]
                })
                .collect(),
            total: observations.len(),
        },
        ResultSet::Conditions(conditions) => TableView {
            columns: CONDITION_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: conditions
                .iter()
                .map(|c| {
                    vec![
                        c.id.clone(),
                        c.patient_id.clone(),
                        c.code.clone(),
                        c.description.clone(),
                        c.severity.clone(),
                        c.onset_date.clone(),
                    ]
                })
                .collect(),
            total: conditions.len(),
        },
    }
}

/// Project a server-provided table section, preserving its column order.
/// Cells absent from a row render as the empty string.
pub fn table_from_api(table: &ApiTable) -> TableView {
    TableView {
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .map(|row| {
                table
                    .columns
                    .iter()
                    .map(|col| row.get(col).map(display_cell).unwrap_or_default())
                    .collect()
            })
            .collect(),
        total: table.total as usize,
    }
}

/// Coerce a JSON cell to its display string. Null renders empty; nested
/// structures fall back to their compact JSON text.
fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Chart
// ============================================================================

/// One chart category with its value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Project a result set into chart points.
///
/// Patients bucket into four fixed age bands; observations contribute one
/// point each (numeric prefix of the raw value, numerator only for
/// slash-separated readings); conditions count per severity in first-seen
/// order.
pub fn chart(results: &ResultSet) -> Vec<ChartPoint> {
    match results {
        ResultSet::Patients(patients) => {
            let mut bands = [0u32; 4];
            for p in patients {
                let idx = match p.age {
                    0..=29 => 0,
                    30..=39 => 1,
                    40..=49 => 2,
                    _ => 3,
                };
                bands[idx] += 1;
            }
            AGE_BAND_LABELS
                .iter()
                .zip(bands)
                .map(|(label, count)| ChartPoint {
                    label: label.to_string(),
                    value: f64::from(count),
                })
                .collect()
        }
        ResultSet::Observations(observations) => observations
            .iter()
            .map(|o| ChartPoint {
                label: o.kind.clone(),
                value: leading_number(&o.value),
            })
            .collect(),
        ResultSet::Conditions(conditions) => {
            let mut severities: Vec<ChartPoint> = Vec::new();
            for c in conditions {
                match severities.iter_mut().find(|p| p.label == c.severity) {
                    Some(point) => point.value += 1.0,
                    None => severities.push(ChartPoint {
                        label: c.severity.clone(),
                        value: 1.0,
                    }),
                }
            }
            severities
        }
    }
}

/// Echo a server-provided chart section: labels paired with the first
/// dataset's values only. Additional series are ignored; a label with no
/// value contributes zero.
pub fn chart_from_api(chart: &ApiChart) -> Vec<ChartPoint> {
    let Some(first) = chart.datasets.first() else {
        return Vec::new();
    };

    chart
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| ChartPoint {
            label: label.clone(),
            value: first.data.get(idx).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Parse the leading numeric portion of a raw observation value.
///
/// A slash-separated reading such as "120/80" contributes its numerator;
/// trailing non-numeric text is dropped. Unparseable values contribute zero.
fn leading_number(raw: &str) -> f64 {
    let numerator = raw.split('/').next().unwrap_or(raw).trim();
    let digits: String = numerator
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

// ============================================================================
// Cards
// ============================================================================

/// A rendered summary card.
///
/// The badge carries a numeric `value` directly, or the literal text "Data"
/// when a non-numeric value accompanies structured data. The body is either
/// a label/value listing of the entry's `data` object or a plain string
/// rendering of its `value`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardView {
    pub label: String,
    pub badge: Option<String>,
    pub lines: Vec<(String, String)>,
    pub text: Option<String>,
}

/// Project server-provided card entries.
pub fn cards_from_api(cards: &[ApiCard]) -> Vec<CardView> {
    cards
        .iter()
        .map(|card| {
            let badge = card.value.as_ref().map(|value| match value {
                Value::Number(n) => n.to_string(),
                _ => "Data".to_string(),
            });

            let lines: Vec<(String, String)> = match card.data.as_ref() {
                Some(Value::Object(map)) => map
                    .iter()
                    .map(|(key, value)| (key.clone(), display_cell(value)))
                    .collect(),
                _ => Vec::new(),
            };

            let text = if lines.is_empty() {
                match card.value.as_ref() {
                    Some(Value::Number(_)) | None => None,
                    Some(other) => Some(display_cell(other)),
                }
            } else {
                None
            };

            CardView {
                label: card.label.clone(),
                badge,
                lines,
                text,
            }
        })
        .collect()
}
