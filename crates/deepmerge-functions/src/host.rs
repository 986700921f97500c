//! The host's typed value tree and its structural mapping to [`Value`].

use std::collections::BTreeMap;

use deepmerge_types::{Number, Record, Value};

use crate::error::{FunctionError, FunctionResult};

/// A value as the host hands it to a function call.
///
/// Unlike [`Value`], the host distinguishes several collection types and can
/// pass values that are not yet known.
#[derive(Clone, Debug, PartialEq)]
pub enum HostValue {
    Null,
    Unknown,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<HostValue>),
    Set(Vec<HostValue>),
    Tuple(Vec<HostValue>),
    Object(BTreeMap<String, HostValue>),
    Map(BTreeMap<String, HostValue>),
}

impl HostValue {
    /// The host type name, as reported in argument errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Unknown => "unknown",
            HostValue::Bool(_) => "bool",
            HostValue::Number(_) => "number",
            HostValue::String(_) => "string",
            HostValue::List(_) => "list",
            HostValue::Set(_) => "set",
            HostValue::Tuple(_) => "tuple",
            HostValue::Object(_) => "object",
            HostValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Elements of a list, set, or tuple.
    pub fn elements(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::List(items) | HostValue::Set(items) | HostValue::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }
}

/// Structurally decode a host value.
///
/// Lists, sets, and tuples become sequences; objects and maps become
/// records. Unknown values cannot be merged and are rejected.
pub fn decode(host: &HostValue) -> FunctionResult<Value> {
    Ok(match host {
        HostValue::Null => Value::Null,
        HostValue::Unknown => return Err(FunctionError::UnknownValue),
        HostValue::Bool(b) => Value::Bool(*b),
        HostValue::Number(n) => Value::Number(n.clone()),
        HostValue::String(s) => Value::String(s.clone()),
        HostValue::List(items) | HostValue::Set(items) | HostValue::Tuple(items) => {
            Value::Sequence(items.iter().map(decode).collect::<FunctionResult<_>>()?)
        }
        HostValue::Object(map) | HostValue::Map(map) => Value::Record(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), decode(v)?)))
                .collect::<FunctionResult<Record>>()?,
        ),
    })
}

/// Encode a value for the host using its most permissive shapes: records
/// become objects and sequences become tuples, so heterogeneous children
/// need no type unification.
pub fn encode(value: &Value) -> HostValue {
    match value {
        Value::Null => HostValue::Null,
        Value::Bool(b) => HostValue::Bool(*b),
        Value::Number(n) => HostValue::Number(n.clone()),
        Value::String(s) => HostValue::String(s.clone()),
        Value::Sequence(items) => HostValue::Tuple(items.iter().map(encode).collect()),
        Value::Record(map) => {
            HostValue::Object(map.iter().map(|(k, v)| (k.clone(), encode(v))).collect())
        }
    }
}

impl From<serde_json::Value> for HostValue {
    /// Arrays map to tuples and objects to objects, matching how the host
    /// types literal expressions.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => HostValue::Null,
            serde_json::Value::Bool(b) => HostValue::Bool(b),
            serde_json::Value::Number(n) => HostValue::Number(n),
            serde_json::Value::String(s) => HostValue::String(s),
            serde_json::Value::Array(items) => {
                HostValue::Tuple(items.into_iter().map(HostValue::from).collect())
            }
            serde_json::Value::Object(map) => HostValue::Object(
                map.into_iter().map(|(k, v)| (k, HostValue::from(v))).collect(),
            ),
        }
    }
}
