//! Graphical timetable generator.
//!
//! Reads a line-based timetable (stations, stop patterns, runs) and draws
//! it as a time-distance diagram: stations across the page, time running
//! down, one sloped path per run. The diagram is emitted as TikZ markup and
//! can be compiled to PDF.

pub mod compile;
pub mod diagram;
pub mod document;
pub mod domain;
pub mod input;
pub mod layout;
pub mod output;
pub mod schedule;
pub mod tikz;
