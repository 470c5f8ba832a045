//! Error types for bhquad.

use thiserror::Error;

use crate::body::BodyId;
use crate::vector::Vector2;

/// Failures of scalar arithmetic on vectors and aggregates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("division by zero in {context}")]
    DivisionByZero { context: &'static str },

    #[error("non-finite value in {context}")]
    NonFinite { context: &'static str },
}

#[derive(Debug, Error)]
pub enum NbodyError {
    #[error("invalid bounding box: min {min} is not dominated by max {max}")]
    InvalidBox { min: Vector2, max: Vector2 },

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("body {id:?} at {position} lies outside the bounding box")]
    BodyOutOfBounds { id: BodyId, position: Vector2 },

    #[error("body {id:?} has invalid mass {mass}")]
    InvalidMass { id: BodyId, mass: f64 },

    #[error("bodies {first:?} and {second:?} cannot be separated near {position}")]
    CoincidentBodies {
        first: BodyId,
        second: BodyId,
        position: Vector2,
    },

    #[error("duplicate body id {0:?}")]
    DuplicateBodyId(BodyId),

    #[error("coordinate arrays differ in length: {previous} previous vs {current} current")]
    LengthMismatch { previous: usize, current: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NbodyError>;
