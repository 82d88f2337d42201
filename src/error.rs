//! Construction-time and parse diagnostics.
//!
//! Runtime numerical conditions (probabilities drifting slightly outside
//! [0,1], self-loop mass approaching 1) are never surfaced here; they are
//! clamped or encoded as sentinel return values by the game and solver
//! layers. This enum covers only failures that make an object unusable
//! from the start.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DartsError {
    /// A target must contain at least one bed.
    #[error("target has no beds")]
    EmptyTarget,

    /// A bed polygon needs at least three vertices.
    #[error("bed {index} has {got} vertices, need at least 3")]
    DegenerateBed { index: usize, got: usize },

    /// In-target beds deduct points; a positive delta would let throws
    /// grow the state and the expected-throws recursion never bottom out.
    #[error("bed {index} has positive score delta {diff}")]
    PositiveBedDiff { index: usize, diff: i32 },

    /// Covariance matrices must be symmetric positive definite.
    #[error("covariance is not positive definite: [[{m00}, {m01}], [{m10}, {m11}]]")]
    BadCovariance {
        m00: f64,
        m01: f64,
        m10: f64,
        m11: f64,
    },

    /// Parameter estimation needs at least two calibration points.
    #[error("need at least 2 calibration points, got {got}")]
    TooFewPoints { got: usize },

    /// Sample counts (Monte-Carlo draws, solver aim samples) must be positive.
    #[error("{what} must be positive")]
    ZeroSamples { what: &'static str },

    /// Heat-map grids must have positive dimensions.
    #[error("heat map grid must be non-empty, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// Target file could not be read.
    #[error("cannot read target file: {0}")]
    Io(#[from] std::io::Error),

    /// Target file contents did not match the expected format.
    #[error("target parse error: expected {expected} (token {position})")]
    Parse {
        expected: &'static str,
        position: usize,
    },
}
