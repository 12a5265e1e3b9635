//! ICS calendar parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::parser::{Component, read_calendar, unfold};

use crate::error::{MeetcalError, MeetcalResult};
use crate::event::StoredEvent;

/// Largest SEQUENCE value (an RFC 5545 INTEGER).
const MAX_SEQUENCE: u32 = i32::MAX as u32;

/// Parse every VEVENT of a calendar document.
///
/// A document that cannot be read, or an event without a UID, is an error:
/// reconciling against a partially understood calendar could treat known
/// events as new.
pub fn parse_calendar(content: &str) -> MeetcalResult<Vec<StoredEvent>> {
    let unfolded = unfold(content);
    if !unfolded.lines().any(|l| l.trim_end() == "BEGIN:VCALENDAR") {
        return Err(MeetcalError::IcsParse("missing BEGIN:VCALENDAR".to_string()));
    }
    let calendar = read_calendar(&unfolded).map_err(|e| MeetcalError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(parse_stored_event)
        .collect()
}

fn parse_stored_event(vevent: &Component) -> MeetcalResult<StoredEvent> {
    let id = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .ok_or_else(|| MeetcalError::IcsParse("VEVENT without UID".to_string()))?;

    // The parser already undoes TEXT escaping for these properties
    let text = |name: &str| vevent.find_prop(name).map(|p| p.val.to_string());

    let sequence = vevent
        .find_prop("SEQUENCE")
        .and_then(|p| p.val.as_ref().trim().parse::<u32>().ok())
        .map(|seq| {
            if seq > MAX_SEQUENCE {
                tracing::warn!(uid = %id, sequence = seq, "capping SEQUENCE at the INTEGER maximum");
            }
            seq.min(MAX_SEQUENCE)
        })
        .unwrap_or(0);

    let last_modified = vevent.find_prop("LAST-MODIFIED").and_then(|p| {
        let raw: &str = p.val.as_ref();
        let parsed = parse_utc(raw);
        if parsed.is_none() {
            tracing::warn!(uid = %id, value = raw, "ignoring unreadable LAST-MODIFIED");
        }
        parsed
    });

    Ok(StoredEvent {
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        status: vevent.find_prop("STATUS").map(|p| p.val.to_string()),
        sequence,
        last_modified,
        id,
    })
}

/// Parse `20250201T120000Z`.
fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim().strip_suffix('Z')?;
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}
