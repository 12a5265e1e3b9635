//! Calendar assembly: every meeting type, year and month in schedule order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::build;
use crate::error::MeetcalResult;
use crate::event::FinalEvent;
use crate::reconcile::{self, Outcome, PriorEvents};
use crate::schedule::{CalendarMeta, MeetingType};

/// The calendar to be written: metadata plus emitted events in assembly order.
#[derive(Debug, Clone)]
pub struct CalendarAggregate {
    pub meta: CalendarMeta,
    pub events: Vec<FinalEvent>,
}

impl CalendarAggregate {
    pub fn new(meta: CalendarMeta) -> Self {
        CalendarAggregate {
            meta,
            events: Vec::new(),
        }
    }

    pub fn product_id(&self) -> String {
        self.meta.product_id()
    }
}

/// What happened to each occurrence during assembly.
#[derive(Debug, Clone, Default)]
pub struct AssemblyReport {
    pub outcomes: Vec<Outcome>,
    /// Prior UIDs that no schedule entry regenerated, in sorted order.
    pub dropped: Vec<String>,
}

impl AssemblyReport {
    pub fn created(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Created(_)))
    }

    pub fn revised(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Revised { .. }))
    }

    pub fn unchanged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Unchanged(_)))
            .count()
    }

    pub fn suppressed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Suppressed(_)))
            .count()
    }

    /// True when the written file would differ only in DTSTAMP.
    pub fn is_unchanged(&self) -> bool {
        self.dropped.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o, Outcome::Unchanged(_) | Outcome::Suppressed(_)))
    }
}

/// Build and reconcile every scheduled occurrence.
///
/// Any error (an occurrence index with no matching day, a wall-clock time
/// that does not exist) aborts the whole run.
pub fn assemble(
    meeting_types: &[MeetingType],
    meta: &CalendarMeta,
    prior: &PriorEvents,
    now: DateTime<Utc>,
) -> MeetcalResult<(CalendarAggregate, AssemblyReport)> {
    let mut calendar = CalendarAggregate::new(meta.clone());
    let mut report = AssemblyReport::default();
    let mut seen = HashSet::new();

    for meeting in meeting_types {
        for (&year, occurrences) in &meeting.schedule {
            for (month, occurrence) in (1u32..).zip(occurrences) {
                let candidate = build::build(occurrence, meeting, year, month, &meta.homepage)?;
                seen.insert(candidate.id.to_string());

                let outcome = reconcile::reconcile(candidate, prior, now);
                if let Some(event) = outcome.event() {
                    calendar.events.push(event.clone());
                }
                report.outcomes.push(outcome);
            }
        }
    }

    let mut dropped: Vec<String> = prior
        .ids()
        .filter(|id| !seen.contains(*id))
        .map(str::to_string)
        .collect();
    dropped.sort();
    report.dropped = dropped;

    tracing::info!(
        events = calendar.events.len(),
        created = report.created().count(),
        revised = report.revised().count(),
        suppressed = report.suppressed_count(),
        dropped = report.dropped.len(),
        "assembled calendar"
    );

    Ok((calendar, report))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::build::tests::tsc_call;
    use crate::error::MeetcalError;
    use crate::event::StoredEvent;
    use crate::schedule::{Occurrence, Topic};
    use chrono::TimeZone;

    fn meta() -> CalendarMeta {
        CalendarMeta {
            name: "Example Calls".into(),
            organization: "Example Org".into(),
            homepage: "example.org".into(),
            summary: "Monthly calls".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    fn meeting_with(year: i32, occurrences: Vec<Occurrence>) -> MeetingType {
        let mut meeting = tsc_call();
        meeting.schedule = BTreeMap::from([(year, occurrences)]);
        meeting
    }

    #[test]
    fn test_months_follow_list_position() {
        let meeting = meeting_with(
            2025,
            vec![
                Occurrence::new(Topic::Absent),
                Occurrence::new(Topic::Text("Budget".into())),
                Occurrence::new(Topic::Cancelled),
            ],
        );

        let (calendar, report) =
            assemble(&[meeting], &meta(), &PriorEvents::default(), now()).unwrap();

        // March is cancelled and new, so it is suppressed
        assert_eq!(calendar.events.len(), 2);
        assert_eq!(report.suppressed_count(), 1);
        assert_eq!(
            calendar.events[0].id().as_str(),
            "202501211100-tsc-call@example.org"
        );
        assert_eq!(
            calendar.events[1].id().as_str(),
            "202502181100-tsc-call@example.org"
        );
        assert_eq!(calendar.events[1].event.summary, "TSC Call: Budget");
    }

    #[test]
    fn test_same_slot_different_titles_do_not_collide() {
        let tsc = meeting_with(2025, vec![Occurrence::new(Topic::Absent)]);
        let mut community = tsc.clone();
        community.title = "Community Call".into();

        let (calendar, _) =
            assemble(&[tsc, community], &meta(), &PriorEvents::default(), now()).unwrap();

        assert_eq!(calendar.events.len(), 2);
        assert_eq!(calendar.events[0].event.start, calendar.events[1].event.start);
        assert_ne!(calendar.events[0].id(), calendar.events[1].id());
    }

    #[test]
    fn test_out_of_range_occurrence_aborts() {
        let mut meeting = meeting_with(
            2025,
            vec![Occurrence::new(Topic::Absent), Occurrence::new(Topic::Absent)],
        );
        // January 2025 has five Wednesdays, February only four
        meeting.weekday = 2;
        meeting.week_of_month = 4;

        let err = assemble(&[meeting], &meta(), &PriorEvents::default(), now()).unwrap_err();
        assert!(matches!(
            err,
            MeetcalError::DateOutOfRange {
                year: 2025,
                month: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_prior_events_not_regenerated_are_reported() {
        let meeting = meeting_with(2025, vec![Occurrence::new(Topic::Absent)]);
        let prior = PriorEvents::new(vec![StoredEvent {
            id: "202412101100-tsc-call@example.org".into(),
            summary: Some("TSC Call".into()),
            ..Default::default()
        }]);

        let (calendar, report) = assemble(&[meeting], &meta(), &prior, now()).unwrap();

        assert_eq!(calendar.events.len(), 1);
        assert_eq!(report.dropped, vec!["202412101100-tsc-call@example.org"]);
        assert!(!report.is_unchanged());
    }
}
