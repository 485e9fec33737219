use thiserror::Error;

use crate::geometry::COORD_LIMIT;

// ── Errors ────────────────────────────────────────────────────────────

/// Why a caller-supplied ring was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputDefect {
    #[error("ring has {0} distinct vertices, at least 3 are required")]
    TooFewVertices(usize),

    #[error("coordinate ({x}, {y}) is outside the supported range ±{}", COORD_LIMIT)]
    OutOfRange { x: i64, y: i64 },

    #[error("coordinate is not a finite number")]
    NonFinite,
}

/// Failure of a boolean or offset call. A call either returns a complete
/// result or one of these; there are no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipError {
    #[error("invalid input ring {ring}: {reason}")]
    InvalidInput { ring: usize, reason: InputDefect },

    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Rounded split points kept introducing new crossings until the pass
    /// limit was reached.
    #[error("edge noding did not settle within {0} passes")]
    NodingIncomplete(usize),
}

pub type ClipResult<T> = Result<T, ClipError>;
