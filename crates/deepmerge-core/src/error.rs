//! Error types for policy resolution.

use deepmerge_types::Kind;

/// Errors that can occur while decoding policy overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The options record named a field outside the policy.
    #[error("unknown option '{field}', expected one of: {}", crate::policy::FIELDS.join(", "))]
    UnknownField { field: String },

    /// A recognized field carried a non-boolean value.
    #[error("option '{field}' must be bool, got: {actual}")]
    Decode { field: String, actual: Kind },

    /// The options record was rejected for any other reason.
    #[error("invalid options: {0}")]
    Rejected(String),
}

/// Convenience alias for policy results.
pub type PolicyResult<T> = Result<T, PolicyError>;
