//! Client-side narrowing of a loaded result set.
//!
//! Filters never re-query the backend: they derive a visible subset from the
//! records already in memory. Application is pure — the loaded set is left
//! untouched and a fresh set is returned on every pass.

use crate::records::ResultSet;

/// User-selected narrowing predicates.
///
/// Predicates are variant-scoped: age range and gender narrow patient sets,
/// severity and code narrow condition sets, and observation sets support no
/// predicates. A predicate aimed at a different variant is a no-op. Active
/// predicates combine with logical AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Age range as entered: "min-max", or "min" for an open-ended range.
    pub age_range: Option<String>,
    /// Exact gender match.
    pub gender: Option<String>,
    /// Exact severity match.
    pub severity: Option<String>,
    /// Case-insensitive substring match against the diagnosis code.
    pub code: Option<String>,
}

impl FilterCriteria {
    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.age_range.is_none()
            && self.gender.is_none()
            && self.severity.is_none()
            && self.code.is_none()
    }

    /// Reset all predicates, restoring the full set as the visible set.
    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }
}

/// An inclusive age range parsed from user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AgeRange {
    min: u32,
    max: Option<u32>,
}

impl AgeRange {
    /// Parse "min-max" or open-ended "min". Malformed input yields `None`,
    /// which deactivates the predicate rather than failing the filter pass.
    fn parse(input: &str) -> Option<Self> {
        let mut parts = input.splitn(2, '-');
        let min = parts.next()?.trim().parse::<u32>().ok()?;
        let max = match parts.next().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u32>().ok()?),
        };
        Some(AgeRange { min, max })
    }

    fn contains(self, age: u32) -> bool {
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }
}

/// Apply the active predicates to a result set.
///
/// Empty criteria is the identity: the returned set holds the same records in
/// the same order as the input.
pub fn apply(results: &ResultSet, criteria: &FilterCriteria) -> ResultSet {
    match results {
        ResultSet::Patients(patients) => {
            let age_range = criteria.age_range.as_deref().and_then(AgeRange::parse);
            let kept = patients
                .iter()
                .filter(|p| age_range.is_none_or(|range| range.contains(p.age)))
                .filter(|p| {
                    criteria
                        .gender
                        .as_deref()
                        .is_none_or(|gender| p.gender == gender)
                })
                .cloned()
                .collect();
            ResultSet::Patients(kept)
        }
        ResultSet::Observations(observations) => ResultSet::Observations(observations.clone()),
        ResultSet::Conditions(conditions) => {
            let code_needle = criteria.code.as_deref().map(str::to_lowercase);
            let kept = conditions
                .iter()
                .filter(|c| {
                    criteria
                        .severity
                        .as_deref()
                        .is_none_or(|severity| c.severity == severity)
                })
                .filter(|c| {
                    code_needle
                        .as_deref()
                        .is_none_or(|needle| c.code.to_lowercase().contains(needle))
                })
                .cloned()
                .collect();
            ResultSet::Conditions(kept)
        }
    }
}
