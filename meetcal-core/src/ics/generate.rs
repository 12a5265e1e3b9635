//! ICS calendar generation.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};

use crate::assemble::CalendarAggregate;
use crate::error::{MeetcalError, MeetcalResult};
use crate::event::FinalEvent;

/// UTC timestamp format used for DTSTAMP and LAST-MODIFIED.
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Generate the full .ics document for an assembled calendar.
///
/// `now` is the run's timestamp and becomes every event's DTSTAMP.
/// Fails when the PRODID would span more than one content line.
pub fn generate_calendar(
    calendar: &CalendarAggregate,
    now: DateTime<Utc>,
) -> MeetcalResult<String> {
    let product_id = calendar.product_id();
    if product_id.contains(['\r', '\n']) {
        return Err(MeetcalError::IcsGenerate(format!(
            "PRODID contains a line break: {product_id:?}"
        )));
    }

    let mut cal = Calendar::new();
    cal.append_property(Property::new("NAME", &calendar.meta.name));
    cal.append_property(Property::new("X-WR-CALNAME", &calendar.meta.name));
    cal.append_property(Property::new("SUMMARY", &calendar.meta.summary));

    let dtstamp = now.format(UTC_FORMAT).to_string();
    for event in &calendar.events {
        cal.push(to_ics_event(event, &dtstamp));
    }
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string(), &product_id))
}

fn to_ics_event(final_event: &FinalEvent, dtstamp: &str) -> icalendar::Event {
    let event = &final_event.event;

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(event.id.as_str());
    ics_event.add_property("DTSTAMP", dtstamp);

    add_zoned_property(&mut ics_event, "DTSTART", &event.start);
    add_zoned_property(&mut ics_event, "DTEND", &event.end);

    ics_event.summary(&event.summary);
    ics_event.location(&event.location);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(status) = event.status {
        ics_event.add_property("STATUS", status.as_ics_str());
    }

    ics_event.add_property("SEQUENCE", final_event.sequence.to_string());

    if let Some(modified) = final_event.last_modified {
        ics_event.add_property("LAST-MODIFIED", modified.format(UTC_FORMAT).to_string());
    }

    ics_event.done()
}

/// Wall-clock time with a TZID parameter, e.g. `DTSTART;TZID=Europe/Berlin:20250318T170000`.
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, time: &DateTime<Tz>) {
    let mut prop = Property::new(name, time.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", time.timezone().name());
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace the crate's PRODID with the calendar's own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(product_id);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
