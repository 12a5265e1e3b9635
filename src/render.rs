//! TUI rendering for run reports.
//!
//! This module provides extension traits that add colored terminal rendering
//! to meetcal-core types using owo_colors.

use meetcal_core::compare::Field;
use meetcal_core::{AssemblyReport, CalendarMeta, CandidateEvent, Outcome};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarMeta {
    fn render(&self) -> String {
        format!("📅 {}", self.name)
    }
}

impl Render for Outcome {
    fn render(&self) -> String {
        let symbol = self.to_string();
        match self {
            Outcome::Created(event) => format!(
                "{} {} {}",
                symbol.green(),
                event.event.summary.green(),
                render_time(&event.event).dimmed()
            ),
            Outcome::Revised { event, changed } => format!(
                "{} {} {} {}",
                symbol.yellow(),
                event.event.summary.yellow(),
                render_time(&event.event).dimmed(),
                format!("(rev {}: {})", event.sequence, render_fields(changed)).dimmed()
            ),
            Outcome::Unchanged(event) => format!(
                "{} {} {}",
                symbol.dimmed(),
                event.event.summary.dimmed(),
                render_time(&event.event).dimmed()
            ),
            Outcome::Suppressed(candidate) => format!(
                "{} {} {}",
                symbol.dimmed(),
                candidate.summary.dimmed(),
                render_time(candidate).dimmed()
            ),
        }
    }
}

fn render_time(event: &CandidateEvent) -> String {
    event.start.format("%Y-%m-%d %H:%M %Z").to_string()
}

fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.ics_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 5;

/// Render a list of outcomes, using counts when there are many and verbose is false
fn render_outcome_list(
    outcomes: &[&Outcome],
    label: &str,
    verbose: bool,
    lines: &mut Vec<String>,
) {
    if outcomes.is_empty() {
        return;
    }
    if verbose || outcomes.len() <= COMPACT_THRESHOLD {
        for outcome in outcomes {
            lines.push(format!("   {}", outcome.render()));
        }
    } else {
        let symbol = outcomes[0].to_string();
        let text = format!("({} {} {})", outcomes.len(), label, pluralize("event", outcomes.len()));
        lines.push(format!("   {} {}", symbol, text));
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Render what a run did (or would do) to the calendar.
pub fn render_report(report: &AssemblyReport, verbose: bool) -> String {
    if report.is_unchanged() {
        return format!(
            "   {}",
            format!("No changes ({} events up to date)", report.unchanged_count()).dimmed()
        );
    }

    let mut lines = Vec::new();

    let created: Vec<_> = report.created().collect();
    render_outcome_list(&created, "new", verbose, &mut lines);

    let revised: Vec<_> = report.revised().collect();
    render_outcome_list(&revised, "revised", verbose, &mut lines);

    for uid in &report.dropped {
        lines.push(format!(
            "   {} {} {}",
            "-".red(),
            uid.red(),
            "(no longer scheduled)".dimmed()
        ));
    }

    let mut quiet = Vec::new();
    if report.unchanged_count() > 0 {
        quiet.push(format!("{} unchanged", report.unchanged_count()));
    }
    if report.suppressed_count() > 0 {
        quiet.push(format!("{} cancelled before publishing", report.suppressed_count()));
    }
    if !quiet.is_empty() {
        lines.push(format!("   {}", quiet.join(", ").dimmed()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 3), "events");
    }

    #[test]
    fn test_empty_report_has_no_changes() {
        let report = AssemblyReport::default();
        assert!(render_report(&report, false).contains("No changes"));
    }
}
