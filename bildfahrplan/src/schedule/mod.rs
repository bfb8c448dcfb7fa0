//! Timetable expansion.
//!
//! A line declares one stop pattern and a list of runs; each run anchors
//! the pattern at a start time and may override times, tracks, name or
//! style for individual stops. This module resolves that description into
//! concrete [`ResolvedRun`]s.

mod error;
mod resolve;
mod types;

pub use error::ResolveError;
pub use resolve::{LineStyle, ResolvedRun, Stop, StopTemplate, resolve_line, resolve_run};
pub use types::{Line, LineOptions, RunDescriptor, RunOverrides, StopEntry, TrackEntry};
