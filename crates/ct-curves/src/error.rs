//! Error types for curve and segment operations.

use thiserror::Error;

/// Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised while parsing or validating curve definitions.
///
/// Evaluation and synthesis never fail; these only surface at the edges
/// (parsing family tags, validating loaded segment lists).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown curve family: {name}")]
    UnknownFamily { name: String },

    #[error("Invalid segment {id}: {what}")]
    InvalidSegment { id: String, what: String },

    #[error("Segments overlap: {first} ends after {second} starts")]
    Overlap { first: String, second: String },
}
