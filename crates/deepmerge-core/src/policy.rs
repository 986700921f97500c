//! Merge policy and its partial override form.

use deepmerge_types::{Record, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PolicyError, PolicyResult};

/// Field names recognized in an options record, in documentation order.
pub const FIELDS: [&str; 5] = [
    "override",
    "null_override",
    "append_list",
    "deep_copy_list",
    "union_lists",
];

/// The five switches that parameterize a merge.
///
/// Constructed once per merge from [`Policy::default`] plus any caller
/// overrides, then read-only for the duration of the merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// A later value replaces an existing one on a non-mergeable collision.
    #[serde(rename = "override")]
    pub override_existing: bool,
    /// A later `Null` replaces an existing value.
    pub null_override: bool,
    /// Colliding sequences are concatenated.
    pub append_list: bool,
    /// Colliding sequences are merged index by index.
    pub deep_copy_list: bool,
    /// Colliding sequences become a deduplicated ordered union.
    pub union_lists: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            override_existing: true,
            null_override: true,
            append_list: false,
            deep_copy_list: false,
            union_lists: false,
        }
    }
}

impl Policy {
    /// Layer each set of overrides onto the defaults, later winning.
    pub fn resolve<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = &'a PolicyOverrides>,
    {
        let policy = overrides
            .into_iter()
            .fold(Self::default(), |policy, o| o.apply(policy));
        debug!(?policy, "resolved merge policy");
        policy
    }

    /// Decode and resolve a sequence of options records.
    pub fn from_records<'a, I>(records: I) -> PolicyResult<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let overrides = records
            .into_iter()
            .map(PolicyOverrides::from_record)
            .collect::<PolicyResult<Vec<_>>>()?;
        Ok(Self::resolve(&overrides))
    }

    /// The policy as an options record, keyed by [`FIELDS`].
    pub fn to_record(&self) -> Record {
        let values = [
            self.override_existing,
            self.null_override,
            self.append_list,
            self.deep_copy_list,
            self.union_lists,
        ];
        FIELDS
            .iter()
            .zip(values)
            .map(|(field, value)| (field.to_string(), Value::Bool(value)))
            .collect()
    }
}

/// A partial policy: only the fields that are `Some` are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyOverrides {
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_existing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_copy_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union_lists: Option<bool>,
}

impl PolicyOverrides {
    /// Decode overrides from an options record through the derived
    /// `Deserialize`.
    ///
    /// Every key must be one of [`FIELDS`]. A key bound to `Null` is treated
    /// as absent; any other non-boolean value is rejected.
    pub fn from_record(record: &Record) -> PolicyResult<Self> {
        let doc = serde_json::Value::from(Value::Record(record.clone()));
        serde_json::from_value(doc).map_err(|err| Self::rejection(record, &err))
    }

    /// Pin a deserialization failure on the first entry that explains it.
    fn rejection(record: &Record, err: &serde_json::Error) -> PolicyError {
        for (field, value) in record {
            if !FIELDS.contains(&field.as_str()) {
                return PolicyError::UnknownField {
                    field: field.clone(),
                };
            }
            if !matches!(value, Value::Null | Value::Bool(_)) {
                return PolicyError::Decode {
                    field: field.clone(),
                    actual: value.kind(),
                };
            }
        }
        PolicyError::Rejected(err.to_string())
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy every set field onto `policy`.
    pub fn apply(&self, mut policy: Policy) -> Policy {
        if let Some(v) = self.override_existing {
            policy.override_existing = v;
        }
        if let Some(v) = self.null_override {
            policy.null_override = v;
        }
        if let Some(v) = self.append_list {
            policy.append_list = v;
        }
        if let Some(v) = self.deep_copy_list {
            policy.deep_copy_list = v;
        }
        if let Some(v) = self.union_lists {
            policy.union_lists = v;
        }
        policy
    }
}
