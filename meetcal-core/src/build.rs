//! Derive candidate events from schedule entries.

use chrono::{Duration, TimeZone};

use crate::date;
use crate::error::{MeetcalError, MeetcalResult};
use crate::event::{CandidateEvent, EventId, EventStatus};
use crate::schedule::{MeetingType, Occurrence, Topic};

/// Topic text used in the summary of cancelled occurrences.
pub const CANCELLED_TOPIC: &str = "CANCELLED";

/// Build the candidate event for `meeting`'s occurrence in `year`-`month`.
pub fn build(
    occurrence: &Occurrence,
    meeting: &MeetingType,
    year: i32,
    month: u32,
    homepage: &str,
) -> MeetcalResult<CandidateEvent> {
    let day = date::resolve(year, month, meeting.chrono_weekday()?, meeting.week_of_month)?;

    let id = EventId::new(day, meeting.hour, meeting.minute, &meeting.title, homepage);

    let naive = day
        .and_hms_opt(meeting.hour, meeting.minute, 0)
        .ok_or_else(|| nonexistent(day.to_string(), meeting))?;
    // Ambiguous wall-clock times (DST fall-back) resolve to the first instant
    let start = meeting
        .timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| nonexistent(naive.to_string(), meeting))?;
    let end = start + Duration::minutes(i64::from(meeting.duration));

    let (topic, status) = match &occurrence.topic {
        Topic::Cancelled => (CANCELLED_TOPIC, Some(EventStatus::Cancelled)),
        Topic::Absent => ("", None),
        Topic::Text(text) => (text.as_str(), None),
    };

    let summary = if topic.is_empty() {
        meeting.title.clone()
    } else {
        format!("{}: {topic}", meeting.title)
    };

    let description = occurrence
        .doc
        .as_ref()
        .map(|doc| format!("Call document {doc}"));

    Ok(CandidateEvent {
        id,
        start,
        end,
        location: meeting.location.clone(),
        summary,
        description,
        status,
    })
}

fn nonexistent(datetime: String, meeting: &MeetingType) -> MeetcalError {
    MeetcalError::NonexistentLocalTime {
        datetime,
        tzid: meeting.timezone.name().to_string(),
    }
}
