//! Revision state machine for regenerated events.
//!
//! Each candidate is matched by identity against the events of the prior
//! calendar file. New identities start at SEQUENCE 0; existing ones advance
//! by one when a compared field changed, and otherwise keep their revision
//! and LAST-MODIFIED untouched. A cancelled event that ends up at revision 0
//! never reached anyone's calendar, so it is not emitted at all.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::compare::{self, Field};
use crate::event::{CandidateEvent, FinalEvent, StoredEvent};

/// Prior events keyed by UID.
#[derive(Debug, Clone, Default)]
pub struct PriorEvents {
    by_id: HashMap<String, StoredEvent>,
}

impl PriorEvents {
    /// Index stored events by UID. If a UID repeats, the last one wins.
    pub fn new(events: Vec<StoredEvent>) -> Self {
        let by_id = events.into_iter().map(|e| (e.id.clone(), e)).collect();
        PriorEvents { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&StoredEvent> {
        self.by_id.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }
}

/// Result of reconciling one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No prior event with this identity.
    Created(FinalEvent),
    /// A compared field changed; the revision advanced.
    Revised {
        event: FinalEvent,
        changed: Vec<Field>,
    },
    /// Prior event found and nothing compared differs.
    Unchanged(FinalEvent),
    /// Cancelled at revision 0; not emitted.
    Suppressed(CandidateEvent),
}

impl Outcome {
    /// The event to write, unless suppressed.
    pub fn event(&self) -> Option<&FinalEvent> {
        match self {
            Outcome::Created(event) | Outcome::Unchanged(event) => Some(event),
            Outcome::Revised { event, .. } => Some(event),
            Outcome::Suppressed(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(_) => write!(f, "+"),
            Outcome::Revised { .. } => write!(f, "~"),
            Outcome::Unchanged(_) => write!(f, "="),
            Outcome::Suppressed(_) => write!(f, "x"),
        }
    }
}

/// Decide revision state for `candidate` given the prior calendar.
pub fn reconcile(candidate: CandidateEvent, prior: &PriorEvents, now: DateTime<Utc>) -> Outcome {
    let Some(stored) = prior.get(candidate.id.as_str()) else {
        if candidate.is_cancelled() {
            tracing::debug!(uid = %candidate.id, "suppressing new cancelled event");
            return Outcome::Suppressed(candidate);
        }
        tracing::debug!(uid = %candidate.id, "new event");
        return Outcome::Created(FinalEvent {
            event: candidate,
            sequence: 0,
            last_modified: None,
        });
    };

    let changed = compare::changed_fields(&candidate, stored);

    if changed.is_empty() {
        if stored.sequence == 0 && candidate.is_cancelled() {
            tracing::debug!(uid = %candidate.id, "suppressing cancelled event at revision 0");
            return Outcome::Suppressed(candidate);
        }
        return Outcome::Unchanged(FinalEvent {
            event: candidate,
            sequence: stored.sequence,
            last_modified: stored.last_modified,
        });
    }

    let sequence = stored.sequence.saturating_add(1);
    tracing::debug!(
        uid = %candidate.id,
        sequence,
        changed = ?changed.iter().map(Field::ics_name).collect::<Vec<_>>(),
        "revised event"
    );

    Outcome::Revised {
        event: FinalEvent {
            event: candidate,
            sequence,
            last_modified: Some(now),
        },
        changed,
    }
}
