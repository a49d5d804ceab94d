//! Error types for argument marshalling.

use thiserror::Error;

/// Errors raised while validating marshalled arguments. All of these are
/// fatal to the current evaluation: dispatch reports them through the
/// host bridge before propagating.
#[derive(Error, Debug)]
pub enum ArgError {
    #[error("Vector argument out of bounds: [{first}, {last}] outside volume {volume}")]
    OutOfBounds { first: i64, last: i64, volume: usize },

    #[error("Shape mismatch: {what}")]
    ShapeMismatch { what: &'static str },

    #[error("Invalid shape: {what}")]
    InvalidShape { what: &'static str },

    #[error("Argument {index} has the wrong kind: expected {expected}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
    },
}

pub type ArgResult<T> = Result<T, ArgError>;
