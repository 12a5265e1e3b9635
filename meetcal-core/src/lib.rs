//! Core of meetcal: turns a schedule of monthly meetings into an iCalendar
//! file and keeps it up to date across runs.
//!
//! - `schedule`: loading and validating the schedule description
//! - `date`, `build`: resolving occurrences into candidate events
//! - `compare`, `reconcile`: revision decisions against a prior calendar
//! - `assemble`: the full pass over a schedule
//! - `ics`, `store`: reading and writing calendar files

pub mod assemble;
pub mod build;
pub mod compare;
pub mod date;
pub mod error;
pub mod event;
pub mod ics;
pub mod reconcile;
pub mod schedule;
pub mod store;

pub use assemble::{AssemblyReport, CalendarAggregate, assemble};
pub use error::{MeetcalError, MeetcalResult};
pub use event::{CandidateEvent, EventId, EventStatus, FinalEvent, StoredEvent};
pub use reconcile::{Outcome, PriorEvents};
pub use schedule::{CalendarMeta, MeetingType, Occurrence, Schedule, Topic};
