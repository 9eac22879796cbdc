//! Session state machine for the single-screen shell.
//!
//! The page's view-state (query text, loading flag, error text, result set,
//! filter criteria) is one explicit state object driven through a single
//! reducer, so the transition invariants — a new query clears filters and
//! errors, filters only apply to a loaded set — live in one place.
//!
//! States and transitions:
//! Idle/Loaded/Errored --submit--> Loading; Loading --success--> Loaded;
//! Loading --failure--> Errored. Submitting an empty query is ignored
//! without a transition.
//!
//! Overlapping dispatches are last-write-wins, as in the original page: a
//! stale response arriving after a newer one overwrites state. Each
//! submission carries a monotonically increasing number so a shell *could*
//! drop stale completions; the bundled shells deliberately do not.

use fdq_types::QueryText;

use crate::envelope::ApiEnvelope;
use crate::filter::{self, FilterCriteria};
use crate::records::ResultSet;

/// What a finished dispatch produced: a simulated record set, or the full
/// backend envelope with its precomputed projections.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome {
    Simulated(ResultSet),
    Api(ApiEnvelope),
}

/// The four observable states of the screen.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Nothing queried yet; the empty state renders.
    Idle,
    /// A dispatch is in flight.
    Loading { query: QueryText, submission: u64 },
    /// A dispatch finished; results render with the active criteria.
    Loaded {
        outcome: QueryOutcome,
        criteria: FilterCriteria,
    },
    /// A dispatch failed; the error banner renders until the next success.
    Errored { message: String },
}

/// Reducer over [`SessionState`].
#[derive(Clone, Debug)]
pub struct Session {
    state: SessionState,
    submissions: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            submissions: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Submit a raw query string.
    ///
    /// Empty or whitespace-only input is silently ignored — no transition,
    /// no dispatch. Otherwise the session moves to Loading and the caller
    /// receives the submission number and validated query to dispatch.
    pub fn submit(&mut self, raw: &str) -> Option<(u64, QueryText)> {
        let query = QueryText::new(raw).ok()?;
        self.submissions += 1;
        let submission = self.submissions;
        self.state = SessionState::Loading {
            query: query.clone(),
            submission,
        };
        Some((submission, query))
    }

    /// Record a successful dispatch.
    ///
    /// Replaces any previous result wholesale, resets filter criteria, and
    /// discards any prior error. Completions are applied regardless of the
    /// submission number: the last response to arrive wins.
    pub fn complete(&mut self, submission: u64, outcome: QueryOutcome) {
        if !self.is_current(submission) {
            tracing::warn!(
                submission,
                latest = self.submissions,
                "stale dispatch completion overwrites newer state"
            );
        }
        self.state = SessionState::Loaded {
            outcome,
            criteria: FilterCriteria::default(),
        };
    }

    /// Record a failed dispatch. The message renders in the error banner
    /// until the next successful dispatch clears it.
    pub fn fail(&mut self, submission: u64, message: String) {
        if !self.is_current(submission) {
            tracing::warn!(
                submission,
                latest = self.submissions,
                "stale dispatch failure overwrites newer state"
            );
        }
        self.state = SessionState::Errored { message };
    }

    /// Whether the given submission is the most recent one.
    pub fn is_current(&self, submission: u64) -> bool {
        submission == self.submissions
    }

    /// Replace the filter criteria. Valid only once loaded; ignored (and
    /// reported as false) in any other state.
    pub fn set_filters(&mut self, criteria: FilterCriteria) -> bool {
        match &mut self.state {
            SessionState::Loaded {
                criteria: current, ..
            } => {
                *current = criteria;
                true
            }
            _ => false,
        }
    }

    /// Reset the criteria to empty, restoring the full set as visible.
    pub fn clear_filters(&mut self) -> bool {
        self.set_filters(FilterCriteria::default())
    }

    /// The active criteria, if any.
    pub fn criteria(&self) -> Option<&FilterCriteria> {
        match &self.state {
            SessionState::Loaded { criteria, .. } => Some(criteria),
            _ => None,
        }
    }

    /// The currently visible record set: the loaded simulated set with the
    /// active criteria applied. Envelope outcomes carry their own
    /// projections and yield `None` here.
    pub fn visible(&self) -> Option<ResultSet> {
        match &self.state {
            SessionState::Loaded {
                outcome: QueryOutcome::Simulated(set),
                criteria,
            } => Some(filter::apply(set, criteria)),
            _ => None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;

    fn loaded_session() -> Session {
        let mut session = Session::new();
        let (submission, _) = session.submit("show me all patients").expect("submit");
        session.complete(
            submission,
            QueryOutcome::Simulated(ResultSet::Patients(dataset::patients())),
        );
        session
    }

    #[test]
    fn starts_idle() {
        assert_eq!(*Session::new().state(), SessionState::Idle);
    }

    #[test]
    fn empty_submit_is_ignored_without_transition() {
        let mut session = Session::new();
        assert!(session.submit("   ").is_none());
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[test]
    fn submit_moves_to_loading() {
        let mut session = Session::new();
        let (submission, query) = session.submit("  find patients ").expect("submit");
        assert_eq!(submission, 1);
        assert_eq!(query.as_str(), "find patients");
        assert!(matches!(
            session.state(),
            SessionState::Loading { submission: 1, .. }
        ));
    }

    #[test]
    fn success_moves_to_loaded_with_empty_criteria() {
        let session = loaded_session();
        match session.state() {
            SessionState::Loaded { criteria, .. } => assert!(criteria.is_empty()),
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[test]
    fn failure_moves_to_errored() {
        let mut session = Session::new();
        let (submission, _) = session.submit("find patients").expect("submit");
        session.fail(submission, "db unreachable".into());
        assert_eq!(
            *session.state(),
            SessionState::Errored {
                message: "db unreachable".into()
            }
        );
    }

    #[test]
    fn new_query_clears_filters_and_errors() {
        let mut session = loaded_session();
        session.set_filters(FilterCriteria {
            gender: Some("Female".into()),
            ..Default::default()
        });

        let (submission, _) = session.submit("second query").expect("submit");
        session.fail(submission, "backend down".into());
        assert!(matches!(session.state(), SessionState::Errored { .. }));

        let (submission, _) = session.submit("third query").expect("submit");
        session.complete(
            submission,
            QueryOutcome::Simulated(ResultSet::Conditions(dataset::conditions())),
        );

        match session.state() {
            SessionState::Loaded { criteria, .. } => assert!(criteria.is_empty()),
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[test]
    fn filters_apply_only_when_loaded() {
        let mut session = Session::new();
        assert!(!session.set_filters(FilterCriteria::default()));

        let mut session = loaded_session();
        assert!(session.set_filters(FilterCriteria {
            gender: Some("Female".into()),
            ..Default::default()
        }));
        let visible = session.visible().expect("visible set");
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn clearing_filters_restores_full_visible_set() {
        let mut session = loaded_session();
        session.set_filters(FilterCriteria {
            gender: Some("Female".into()),
            ..Default::default()
        });
        assert_eq!(session.visible().expect("visible").len(), 1);

        session.clear_filters();
        assert_eq!(session.visible().expect("visible").len(), 3);
    }

    #[test]
    fn stale_completion_still_overwrites() {
        let mut session = Session::new();
        let (first, _) = session.submit("first").expect("submit");
        let (second, _) = session.submit("second").expect("submit");
        assert!(session.is_current(second));
        assert!(!session.is_current(first));

        session.complete(
            second,
            QueryOutcome::Simulated(ResultSet::Conditions(dataset::conditions())),
        );
        // The slow first response lands late and wins anyway.
        session.complete(
            first,
            QueryOutcome::Simulated(ResultSet::Patients(dataset::patients())),
        );

        match session.state() {
            SessionState::Loaded {
                outcome: QueryOutcome::Simulated(set),
                ..
            } => assert_eq!(set.kind().as_str(), "patients"),
            other => panic!("expected loaded patients, got {other:?}"),
        }
    }
}
