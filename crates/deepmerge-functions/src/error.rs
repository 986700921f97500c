//! Error types for function calls.
//!
//! Every argument error names the offending parameter and, for elements of
//! a collection argument, the 1-based position of the element.

use deepmerge_codec::CodecError;

/// Errors that abort a function call. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunctionError {
    /// A non-nullable parameter received null.
    #[error("Invalid value for \"{parameter}\" parameter: argument must not be null.")]
    NullArgument { parameter: &'static str },

    /// The `objects` argument is not a collection of the expected shape.
    #[error("Invalid value for \"objects\" parameter: {expected} required, got: {actual}")]
    ObjectsType {
        expected: &'static str,
        actual: &'static str,
    },

    /// An element of `objects` has the wrong kind.
    #[error("Invalid value for \"objects\" parameter: merging argument {index} must be {expected}, got: {actual}")]
    ObjectKind {
        index: usize,
        expected: &'static str,
        actual: String,
    },

    /// An element of `objects` could not be decoded.
    #[error("Invalid value for \"objects\" parameter: {message} (merging argument {index})")]
    ObjectDecode { index: usize, message: String },

    /// An `options` argument could not be decoded into policy overrides.
    #[error("Invalid value for \"options\" parameter: options argument {index}: {message}")]
    OptionDecode { index: usize, message: String },

    /// A value the host has not computed yet reached the decoder.
    #[error("value is not yet known")]
    UnknownValue,

    /// No function is registered under this name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The merge result could not be rendered.
    #[error(transparent)]
    Result(#[from] CodecError),
}

impl FunctionError {
    /// The 1-based position of the offending element, if the error concerns
    /// one element of a collection argument.
    pub fn argument_index(&self) -> Option<usize> {
        match self {
            Self::ObjectKind { index, .. }
            | Self::ObjectDecode { index, .. }
            | Self::OptionDecode { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Convenience alias for function results.
pub type FunctionResult<T> = Result<T, FunctionError>;
