//! Resolver error types.

use crate::domain::TimeFormatError;

/// Errors raised while turning a line into concrete runs.
///
/// Override entries naming a station that is not in the stop pattern are
/// not an error: they are skipped (and logged at debug level).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// A time in the stop pattern, an override or an anchor is not readable
    #[error(transparent)]
    Time(#[from] TimeFormatError),

    /// The stop pattern has no stops, so there is nothing to anchor
    #[error("stop pattern is empty")]
    EmptyTemplate,
}
