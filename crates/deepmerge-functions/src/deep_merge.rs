use deepmerge_types::{Record, Value};
use tracing::trace;

use crate::error::{FunctionError, FunctionResult};
use crate::function::{MergeFunction, Parameter, ParameterType};
use crate::host::{self, HostValue};

const DESCRIPTION: &str = "\
Merges a list of objects left to right. Nested objects are merged \
recursively; for any other collision the later value wins unless \
`override` is disabled. Lists are replaced unless `append_list`, \
`union_lists`, or `deep_copy_list` is enabled. A later `null` replaces an \
earlier value unless `null_override` is disabled.";

/// `deep_merge(objects, options...)`: merge host objects into a host object.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeepMerge;

impl MergeFunction for DeepMerge {
    fn name(&self) -> &'static str {
        "deep_merge"
    }

    fn summary(&self) -> &'static str {
        "Deep merge objects"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn objects_parameter(&self) -> Parameter {
        Parameter {
            name: "objects",
            description: "List of objects to merge",
            param_type: ParameterType::Dynamic,
            allow_null: false,
        }
    }

    /// Accepts a list, set, or tuple of objects. Empty objects are dropped.
    fn collect_objects(&self, objects: &HostValue) -> FunctionResult<Vec<Record>> {
        let elems = objects.elements().ok_or(FunctionError::ObjectsType {
            expected: "list of objects",
            actual: objects.type_name(),
        })?;

        let mut out = Vec::with_capacity(elems.len());
        for (i, elem) in elems.iter().enumerate() {
            let index = i + 1;
            let value = host::decode(elem).map_err(|e| FunctionError::ObjectDecode {
                index,
                message: e.to_string(),
            })?;
            let record = match value {
                Value::Record(record) => record,
                other => {
                    return Err(FunctionError::ObjectKind {
                        index,
                        expected: "object",
                        actual: other.kind().to_string(),
                    })
                }
            };
            if record.is_empty() {
                trace!(index, "skipping empty object");
                continue;
            }
            out.push(record);
        }
        Ok(out)
    }

    fn render_result(&self, merged: Record) -> FunctionResult<HostValue> {
        Ok(host::encode(&Value::Record(merged)))
    }
}
