//! Event types: freshly built candidates, events read back from a prior
//! calendar file, and reconciled events ready to be written.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Stable identifier of an event (the iCalendar UID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
    /// Build an identity from the meeting slot and the calendar namespace.
    ///
    /// Only the date, wall-clock time and meeting title take part, so topic,
    /// status and revision changes never move an event to a new identity.
    pub fn new(date: NaiveDate, hour: u32, minute: u32, title: &str, homepage: &str) -> Self {
        EventId(format!(
            "{}{hour:02}{minute:02}-{}@{homepage}",
            date.format("%Y%m%d"),
            slug::slugify(title)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EventId {
    fn from(uid: String) -> Self {
        EventId(uid)
    }
}

impl From<&str> for EventId {
    fn from(uid: &str) -> Self {
        EventId(uid.to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Cancelled,
}

impl EventStatus {
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            EventStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Event content derived from the schedule, before revision state is known.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvent {
    pub id: EventId,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
}

impl CandidateEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(EventStatus::Cancelled)
    }
}

/// An event as recorded in a previously generated calendar file.
///
/// Field values are kept as the strings read from the file; this is only
/// ever used as comparison input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// SEQUENCE; absent or unreadable values count as 0.
    pub sequence: u32,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A reconciled event: candidate content plus resolved revision state.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalEvent {
    pub event: CandidateEvent,
    pub sequence: u32,
    pub last_modified: Option<DateTime<Utc>>,
}

impl FinalEvent {
    pub fn id(&self) -> &EventId {
        &self.event.id
    }
}
