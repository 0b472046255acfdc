//! Error type shared by the solver, the instance loader and the benchmark tools.

use thiserror::Error;

/// Errors raised by GRASP components.
///
/// Apart from `Io` and `Parse`, every variant marks a broken precondition
/// in the caller rather than a transient runtime condition.
#[derive(Debug, Error)]
pub enum GraspError {
    #[error("instance has {found} cities, at least {required} are required")]
    TooFewCities { found: usize, required: usize },

    #[error("alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("max_iterations must be positive")]
    InvalidIterations,

    #[error("max_no_improve must be positive")]
    InvalidPatience,

    #[error("tour is not a permutation of {expected} cities: {reason}")]
    InvalidTour { expected: usize, reason: String },

    #[error("distance between cities {from} and {to} is not a finite number")]
    NonFiniteDistance { from: usize, to: usize },

    #[error("no valid second cut point after {0} draws")]
    ResampleExhausted(usize),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraspError>;
