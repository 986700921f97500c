use deepmerge_codec::{decode_record, encode_record, Format};
use deepmerge_types::Record;

use crate::error::{FunctionError, FunctionResult};
use crate::function::{MergeFunction, Parameter, ParameterType};
use crate::host::HostValue;

const DESCRIPTION: &str = "\
Decodes each string as a YAML mapping, merges the mappings left to right \
with the same rules and options as `deep_merge`, and returns the result \
encoded as YAML. An empty result is returned as an empty string.";

/// `yaml_deep_merge(objects, options...)`: merge YAML documents into a YAML
/// document.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlDeepMerge;

impl MergeFunction for YamlDeepMerge {
    fn name(&self) -> &'static str {
        "yaml_deep_merge"
    }

    fn summary(&self) -> &'static str {
        "Deep merge YAML-encoded objects"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn objects_parameter(&self) -> Parameter {
        Parameter {
            name: "objects",
            description: "List of YAML strings to merge",
            param_type: ParameterType::ListOfString,
            allow_null: false,
        }
    }

    /// The host converts sets and tuples of strings to lists before the
    /// call, so all three are accepted here.
    fn collect_objects(&self, objects: &HostValue) -> FunctionResult<Vec<Record>> {
        let elems = objects.elements().ok_or(FunctionError::ObjectsType {
            expected: "list of string",
            actual: objects.type_name(),
        })?;

        elems
            .iter()
            .enumerate()
            .map(|(i, elem)| {
                let index = i + 1;
                let HostValue::String(text) = elem else {
                    return Err(FunctionError::ObjectKind {
                        index,
                        expected: "string",
                        actual: elem.type_name().to_string(),
                    });
                };
                decode_record(Format::Yaml, text).map_err(|e| FunctionError::ObjectDecode {
                    index,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    fn render_result(&self, merged: Record) -> FunctionResult<HostValue> {
        Ok(HostValue::String(encode_record(Format::Yaml, &merged)?))
    }
}
