//! Field comparison between a candidate event and its stored counterpart.
//!
//! Stored values come from a re-parsed calendar file, so comparison is done
//! on strings. A field is "unset" when it is absent or empty; this is the
//! only place that definition lives.

use crate::event::{CandidateEvent, StoredEvent};

/// Fields whose change makes an event a new revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Summary,
    Description,
    Location,
    Status,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Summary,
        Field::Description,
        Field::Location,
        Field::Status,
    ];

    pub fn ics_name(&self) -> &'static str {
        match self {
            Field::Summary => "SUMMARY",
            Field::Description => "DESCRIPTION",
            Field::Location => "LOCATION",
            Field::Status => "STATUS",
        }
    }

    fn candidate_value<'a>(&self, event: &'a CandidateEvent) -> Option<&'a str> {
        match self {
            Field::Summary => Some(event.summary.as_str()),
            Field::Description => event.description.as_deref(),
            Field::Location => Some(event.location.as_str()),
            Field::Status => event.status.map(|s| s.as_ics_str()),
        }
    }

    fn stored_value<'a>(&self, event: &'a StoredEvent) -> Option<&'a str> {
        match self {
            Field::Summary => event.summary.as_deref(),
            Field::Description => event.description.as_deref(),
            Field::Location => event.location.as_deref(),
            Field::Status => event.status.as_deref(),
        }
    }
}

/// Normalize a field value: empty strings count as unset.
fn set(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Whether a field counts as changed.
///
/// Only forward-specified changes count: an unset candidate value never
/// mismatches, even when the stored value was set.
pub fn is_changed(candidate: Option<&str>, stored: Option<&str>) -> bool {
    match set(candidate) {
        Some(new) => set(stored) != Some(new),
        None => false,
    }
}

/// Fields of `candidate` that differ from `stored`.
pub fn changed_fields(candidate: &CandidateEvent, stored: &StoredEvent) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| is_changed(field.candidate_value(candidate), field.stored_value(stored)))
        .collect()
}
