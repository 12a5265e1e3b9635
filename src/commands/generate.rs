use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use meetcal_core::ics::generate_calendar;
use meetcal_core::{Schedule, assemble, store};
use owo_colors::OwoColorize;

use crate::render::{Render, render_report};

/// Generate the calendar for `schedule_path`, updating `ics_path` if given.
///
/// Without an .ics path the calendar goes to stdout and the report to stderr.
pub fn run(
    schedule_path: &Path,
    ics_path: Option<&Path>,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    // One timestamp for the whole run: every revision bumped now shares it
    let now = Utc::now().trunc_subsecs(0);
    tracing::debug!(%now, schedule = %schedule_path.display(), "starting run");

    let schedule = Schedule::load(schedule_path)
        .with_context(|| format!("Failed to load schedule {}", schedule_path.display()))?;

    let prior = store::read_prior(ics_path).with_context(|| match ics_path {
        Some(path) => format!("Failed to read calendar {}", path.display()),
        None => "Failed to read calendar".to_string(),
    })?;

    let (calendar, report) = assemble(&schedule.meeting_types, &schedule.meta, &prior, now)
        .context("Failed to assemble calendar")?;
    let ics = generate_calendar(&calendar, now)?;

    let Some(path) = ics_path else {
        eprintln!("{}", schedule.meta.render());
        eprintln!("{}", render_report(&report, verbose));
        print!("{ics}");
        return Ok(());
    };

    println!("{} {}", schedule.meta.render(), path.display().dimmed());
    println!("{}", render_report(&report, verbose));

    if dry_run {
        println!("\n{}", "Dry run, calendar not written".dimmed());
        return Ok(());
    }

    store::write_atomic(path, &ics)
        .with_context(|| format!("Failed to write calendar {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetcal_core::MeetcalError;
    use meetcal_core::ics::parse_calendar;

    const SCHEDULE: &str = r#"
name: Example Calls
organization: Example Org
homepage: example.org
summary: Monthly calls of the Example Org
call_types:
  - title: TSC Call
    day_of_week: 1
    week_of_month: 2
    hour: 11
    minute: 0
    duration: 60
    timezone: America/New_York
    url: https://meet.example.org/tsc
    schedule:
      2025:
        - topic: Kickoff
          doc: 101
        - ~
        - false
  - title: Community Call
    day_of_week: 1
    week_of_month: 2
    hour: 11
    minute: 0
    duration: 30
    timezone: America/New_York
    url: https://meet.example.org/community
    schedule:
      2025:
        - Welcome
"#;

    #[test]
    fn test_run_writes_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = dir.path().join("calls.yaml");
        let ics = dir.path().join("calls.ics");
        std::fs::write(&schedule, SCHEDULE).unwrap();

        run(&schedule, Some(&ics), false, false).unwrap();

        let content = std::fs::read_to_string(&ics).unwrap();
        assert!(content.contains("PRODID:-//Example Org//example.org//EN"));

        let events = parse_calendar(&content).unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "202501211100-tsc-call@example.org",
                "202502181100-tsc-call@example.org",
                "202501211100-community-call@example.org",
            ]
        );
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = dir.path().join("calls.yaml");
        let ics = dir.path().join("calls.ics");
        std::fs::write(&schedule, SCHEDULE).unwrap();

        run(&schedule, Some(&ics), true, false).unwrap();

        assert!(!ics.exists());
    }

    #[test]
    fn test_run_fails_on_out_of_range_occurrence_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = dir.path().join("calls.yaml");
        let ics = dir.path().join("calls.ics");
        // Fifth Tuesday: January 2025 has four
        std::fs::write(&schedule, SCHEDULE.replacen("week_of_month: 2", "week_of_month: 4", 1))
            .unwrap();

        let err = run(&schedule, Some(&ics), false, false).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MeetcalError>(),
            Some(MeetcalError::DateOutOfRange { .. })
        ));
        assert!(!ics.exists());
    }

    #[test]
    fn test_run_missing_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("missing.yaml"), None, false, false).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MeetcalError>(),
            Some(MeetcalError::InputNotFound(_))
        ));
    }
}
