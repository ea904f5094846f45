//! Error types for the burr solver.

use thiserror::Error;

/// Result type alias for burr solver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by malformed input or catalog I/O.
///
/// An unsolvable puzzle is not an error; see [`crate::solver::SolveOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    /// Direction name outside the six axis-aligned directions.
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// Axis name other than `X`, `Y` or `Z`.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    /// Orientation outside 0-7 (or letter outside `a`-`h`).
    #[error("invalid orientation: {0}")]
    InvalidOrientation(String),

    /// Malformed `(x,y,z,axis)` position.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Malformed piece in a puzzle state string.
    #[error("invalid piece: {0}")]
    InvalidPiece(String),

    /// A puzzle needs exactly six shapes.
    #[error("expected 6 shapes, got {0}")]
    ShapeCount(usize),

    /// Catalog has no puzzle at the requested index.
    #[error("no puzzle {index} in catalog ({count} puzzles)")]
    UnknownPuzzle { index: usize, count: usize },

    /// A solution disagrees with the catalog's expected answer.
    #[error("solution mismatch: {0}")]
    Mismatch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
