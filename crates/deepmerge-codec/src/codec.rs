use deepmerge_types::{Record, Value};
use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::format::Format;

/// Decode a single document into a dynamic value.
///
/// Blank input decodes to `Null`. YAML merge keys (`<<: *anchor`) are
/// resolved before conversion.
pub fn decode_value(format: Format, text: &str) -> CodecResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value = match format {
        Format::Yaml => decode_yaml(text).map_err(|e| CodecError::parse(format, e.to_string()))?,
        Format::Json => {
            serde_json::from_str::<Value>(text).map_err(|e| CodecError::parse(format, e.to_string()))?
        }
    };
    trace!(%format, kind = %value.kind(), bytes = text.len(), "decoded document");
    Ok(value)
}

fn decode_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    let mut doc: serde_yaml::Value = serde_yaml::from_str(text)?;
    doc.apply_merge()?;
    serde_yaml::from_value(doc)
}

/// Decode a document that must hold a mapping.
///
/// A blank or `null` document yields an empty record.
pub fn decode_record(format: Format, text: &str) -> CodecResult<Record> {
    match decode_value(format, text)? {
        Value::Null => Ok(Record::new()),
        Value::Record(map) => Ok(map),
        other => Err(CodecError::NotARecord {
            format,
            kind: other.kind(),
        }),
    }
}

/// Encode a record as a document.
///
/// An empty record encodes to the empty string in YAML; JSON output is
/// pretty-printed with a trailing newline.
pub fn encode_record(format: Format, record: &Record) -> CodecResult<String> {
    match format {
        Format::Yaml if record.is_empty() => Ok(String::new()),
        Format::Yaml => serde_yaml::to_string(record).map_err(|e| CodecError::Encode {
            format,
            message: e.to_string(),
        }),
        Format::Json => serde_json::to_string_pretty(record)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| CodecError::Encode {
                format,
                message: e.to_string(),
            }),
    }
}
