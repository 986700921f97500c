//! Text codecs for deepmerge.
//!
//! Decodes YAML or JSON documents into [`Record`](deepmerge_types::Record)s
//! and encodes merge results back into text. A document that is blank or
//! holds only `null` decodes to an empty record; any other non-mapping
//! document is rejected.

pub mod codec;
pub mod error;
pub mod format;

pub use codec::{decode_record, decode_value, encode_record};
pub use error::{CodecError, CodecResult};
pub use format::Format;
