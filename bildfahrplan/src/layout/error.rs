//! Layout error types.

/// Errors raised while placing runs on the diagram.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The station axis needs at least two stations to interpolate
    #[error("station axis needs at least two stations, got {count}")]
    DegenerateAxis { count: usize },

    /// A run stops at a station that is not in the station list
    #[error("station {0:?} is not in the station list")]
    UnknownStation(String),

    /// Pages must cover a positive time span
    #[error("page width must be positive, got {0}")]
    InvalidPageWidth(f64),

    /// Grid lines must advance
    #[error("time grid step must be positive, got {0}")]
    InvalidGridStep(f64),
}
