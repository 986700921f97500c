use thiserror::Error;

use crate::value::Kind;

/// Errors produced by value conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected {expected}, got {actual}")]
    KindMismatch { expected: Kind, actual: Kind },

    #[error("number is not finite: {0}")]
    NonFiniteNumber(String),
}
