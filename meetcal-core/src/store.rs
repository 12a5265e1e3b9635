//! Reading the prior calendar file and writing its replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::MeetcalResult;
use crate::ics::parse_calendar;
use crate::reconcile::PriorEvents;

/// Load prior events from `path`.
///
/// No path, or a path with no file yet, means there is no prior state.
pub fn read_prior(path: Option<&Path>) -> MeetcalResult<PriorEvents> {
    let Some(path) = path else {
        return Ok(PriorEvents::default());
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "no existing calendar, starting fresh");
        return Ok(PriorEvents::default());
    }

    let content = std::fs::read_to_string(path)?;
    let events = parse_calendar(&content)?;
    tracing::info!(path = %path.display(), events = events.len(), "read existing calendar");

    Ok(PriorEvents::new(events))
}

/// Replace `path` with `contents` in one step.
///
/// The data is written to a temporary file next to the target and renamed
/// over it, so readers never see a half-written calendar.
pub fn write_atomic(path: &Path, contents: &str) -> MeetcalResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote calendar");
    Ok(())
}
