//! Error types for meetcal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating or updating a meeting calendar.
#[derive(Error, Debug)]
pub enum MeetcalError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed schedule at {path}: {message}")]
    MalformedInput { path: String, message: String },

    #[error("No occurrence at index {index} of weekday {weekday} in {year}-{month:02}")]
    DateOutOfRange {
        year: i32,
        month: u32,
        weekday: u8,
        index: u8,
    },

    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Local time {datetime} does not exist in {tzid}")]
    NonexistentLocalTime { datetime: String, tzid: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeetcalError {
    pub(crate) fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        MeetcalError::MalformedInput {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for meetcal operations.
pub type MeetcalResult<T> = Result<T, MeetcalError>;
