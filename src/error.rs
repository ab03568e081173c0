//! Error types for the tessellation pipeline.

/// Errors that can occur while computing a tessellation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoronoiError {
    /// The bounding rectangle is empty, inverted or not finite.
    #[error("invalid bounds: min {min:?} must be strictly below max {max:?}")]
    InvalidBounds { min: [f64; 2], max: [f64; 2] },

    /// A generator has a non-finite coordinate.
    #[error("invalid site {index}: ({x}, {y}) is not finite")]
    InvalidSite { index: usize, x: f64, y: f64 },

    /// Two generators share a position. The beachline ordering is undefined for
    /// coincident sites, so they are rejected before sweeping.
    #[error("duplicate sites {first} and {second}")]
    DuplicateSite { first: usize, second: usize },

    /// A centroid was requested for a polygon without area.
    #[error("degenerate polygon with area {area}")]
    DegeneratePolygon { area: f64 },

    /// Internal invariant violation.
    /// This should not happen with valid input and indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
