//! Domain types shared by the resolver and the diagram layout.
//!
//! Times are plain fractional minutes (`f64`) once they leave this module;
//! the types here cover the boundary where input text becomes numbers and
//! where option objects become ordered drawing options.

mod station;
mod style;
mod time;

pub use station::Station;
pub use style::{ElementOption, OptionValue, StyleError, StyleOptions};
pub use time::{TimeFormatError, TimeValue, format_minutes, parse_minutes};
