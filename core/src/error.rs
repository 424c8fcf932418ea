use thiserror::Error;

use crate::geometry::Point;

/// Errors raised by maze generation and the structures it builds.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Points that should be grid neighbours are not, or a window has the wrong shape.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("point {0} is not part of the trails")]
    PointNotFound(Point),

    #[error("unsupported trails encoding version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("no valid transform found after {0} attempts")]
    RetryExhausted(usize),

    /// A generate-and-test loop ran past its budget.
    #[error("{what} exceeded its iteration limit of {limit}")]
    IterationLimit { what: &'static str, limit: u64 },

    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
