use tracing::debug;

use crate::deep_merge::DeepMerge;
use crate::error::{FunctionError, FunctionResult};
use crate::function::{CallArguments, FunctionDefinition, MergeFunction};
use crate::host::HostValue;
use crate::yaml_deep_merge::YamlDeepMerge;

/// Registry of the merge functions exposed to a host.
pub struct Provider {
    version: String,
    functions: Vec<Box<dyn MergeFunction>>,
}

impl Provider {
    /// A provider with `deep_merge` and `yaml_deep_merge` registered.
    pub fn new(version: impl Into<String>) -> Self {
        let mut provider = Self {
            version: version.into(),
            functions: Vec::new(),
        };
        provider.register(Box::new(DeepMerge));
        provider.register(Box::new(YamlDeepMerge));
        provider
    }

    /// Add a function. A later registration shadows an earlier one with the
    /// same name.
    pub fn register(&mut self, function: Box<dyn MergeFunction>) {
        self.functions.retain(|f| f.name() != function.name());
        self.functions.push(function);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Definitions of every registered function, in registration order.
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        self.functions.iter().map(|f| f.definition()).collect()
    }

    pub fn function(&self, name: &str) -> Option<&dyn MergeFunction> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    /// Dispatch a call by function name.
    pub fn call(&self, name: &str, args: &CallArguments) -> FunctionResult<HostValue> {
        let function = self
            .function(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))?;
        debug!(function = name, options = args.options.len(), "dispatching call");
        function.call(args)
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}
