use deepmerge_types::Kind;
use thiserror::Error;

use crate::format::Format;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("error unmarshaling {format}: {message}")]
    Parse { format: Format, message: String },

    #[error("{format} document must be a mapping, got: {kind}")]
    NotARecord { format: Format, kind: Kind },

    #[error("error marshaling merged result to {format}: {message}")]
    Encode { format: Format, message: String },
}

impl CodecError {
    /// Build a parse error, naming the surface format in the parser text.
    ///
    /// Parsers shared between formats describe themselves in their messages;
    /// every other format's name is rewritten to `format`.
    pub fn parse(format: Format, message: impl Into<String>) -> Self {
        let mut message = message.into();
        for other in Format::ALL.iter().filter(|f| **f != format) {
            message = message.replace(other.name(), format.name());
        }
        Self::Parse { format, message }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
