use deepmerge_core::{merge_all, Policy, PolicyOverrides};
use deepmerge_types::Record;
use tracing::debug;

use crate::error::{FunctionError, FunctionResult};
use crate::host::{self, HostValue};

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// The type a parameter accepts, as advertised to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterType {
    /// Any value; shape is checked at call time.
    Dynamic,
    /// A list whose elements are strings.
    ListOfString,
}

/// A declared function parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: ParameterType,
    pub allow_null: bool,
}

/// Metadata the host needs to expose a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub parameters: Vec<Parameter>,
    /// Trailing parameter that may repeat zero or more times.
    pub variadic: Option<Parameter>,
}

/// The variadic `options` parameter shared by every merge function.
pub const OPTIONS_PARAMETER: Parameter = Parameter {
    name: "options",
    description: "Merging options",
    param_type: ParameterType::Dynamic,
    allow_null: false,
};

/// Arguments of a single call: the `objects` argument followed by any
/// number of `options` arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CallArguments {
    pub objects: HostValue,
    pub options: Vec<HostValue>,
}

impl CallArguments {
    pub fn new(objects: HostValue) -> Self {
        Self {
            objects,
            options: Vec::new(),
        }
    }

    /// Append one `options` argument.
    pub fn with_options(mut self, options: HostValue) -> Self {
        self.options.push(options);
        self
    }
}

// ---------------------------------------------------------------------------
// MergeFunction
// ---------------------------------------------------------------------------

/// A host-callable merge function.
///
/// Implementors decide how the `objects` argument is decoded and how the
/// merged record is handed back; option handling, validation, and the merge
/// itself are shared through [`MergeFunction::call`].
pub trait MergeFunction: Send + Sync {
    /// Name the host calls the function by.
    fn name(&self) -> &'static str;

    fn summary(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Declaration of the `objects` parameter.
    fn objects_parameter(&self) -> Parameter;

    /// Decode the `objects` argument into the records to merge, in order.
    fn collect_objects(&self, objects: &HostValue) -> FunctionResult<Vec<Record>>;

    /// Turn the merge result into the value returned to the host.
    fn render_result(&self, merged: Record) -> FunctionResult<HostValue>;

    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            name: self.name(),
            summary: self.summary(),
            description: self.description(),
            parameters: vec![self.objects_parameter()],
            variadic: Some(OPTIONS_PARAMETER),
        }
    }

    /// Resolve the effective policy from the `options` arguments.
    fn resolve_options(&self, options: &[HostValue]) -> FunctionResult<Policy> {
        let overrides = options
            .iter()
            .enumerate()
            .map(|(i, opt)| decode_options(i + 1, opt))
            .collect::<FunctionResult<Vec<_>>>()?;
        Ok(Policy::resolve(&overrides))
    }

    /// Validate arguments, merge, and render.
    fn call(&self, args: &CallArguments) -> FunctionResult<HostValue> {
        validate_arguments(&self.definition(), args)?;
        let objects = self.collect_objects(&args.objects)?;
        let policy = self.resolve_options(&args.options)?;
        debug!(function = self.name(), inputs = objects.len(), ?policy, "running merge");
        let merged = merge_all(&objects, &policy);
        self.render_result(merged)
    }
}

/// Reject null arguments for parameters that do not allow them.
pub fn validate_arguments(definition: &FunctionDefinition, args: &CallArguments) -> FunctionResult<()> {
    if let Some(objects) = definition.parameters.first() {
        if !objects.allow_null && args.objects.is_null() {
            return Err(FunctionError::NullArgument {
                parameter: objects.name,
            });
        }
    }
    if let Some(variadic) = &definition.variadic {
        if !variadic.allow_null && args.options.iter().any(HostValue::is_null) {
            return Err(FunctionError::NullArgument {
                parameter: variadic.name,
            });
        }
    }
    Ok(())
}

/// Decode one `options` argument; `index` is 1-based.
fn decode_options(index: usize, options: &HostValue) -> FunctionResult<PolicyOverrides> {
    let err = |message: String| FunctionError::OptionDecode { index, message };
    let record = host::decode(options)
        .map_err(|e| err(e.to_string()))?
        .into_record()
        .map_err(|e| err(e.to_string()))?;
    PolicyOverrides::from_record(&record).map_err(|e| err(e.to_string()))
}
