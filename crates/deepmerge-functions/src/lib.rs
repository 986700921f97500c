//! Host-callable deepmerge functions.
//!
//! A host (a configuration language runtime, a plugin framework) passes
//! typed values to a function call. This crate models that boundary:
//! [`HostValue`] is the host's typed tree, [`MergeFunction`] is the shared
//! call driver, and [`Provider`] registers the two functions on offer:
//!
//! - `deep_merge(objects, options...)` merges a list of objects and returns
//!   an object.
//! - `yaml_deep_merge(objects, options...)` merges a list of YAML documents
//!   and returns a YAML document.
//!
//! # Quick Start
//!
//! ```rust
//! use deepmerge_functions::{CallArguments, HostValue, Provider};
//! use serde_json::json;
//!
//! let provider = Provider::default();
//! let args = CallArguments::new(HostValue::from(json!([{"a": [1]}, {"a": [2]}])))
//!     .with_options(HostValue::from(json!({"append_list": true})));
//! let out = provider.call("deep_merge", &args).unwrap();
//! assert_eq!(out, HostValue::from(json!({"a": [1, 2]})));
//! ```

pub mod deep_merge;
pub mod error;
pub mod function;
pub mod host;
pub mod provider;
pub mod yaml_deep_merge;

pub use deep_merge::DeepMerge;
pub use error::{FunctionError, FunctionResult};
pub use function::{
    validate_arguments, CallArguments, FunctionDefinition, MergeFunction, Parameter,
    ParameterType, OPTIONS_PARAMETER,
};
pub use host::HostValue;
pub use provider::Provider;
pub use yaml_deep_merge::YamlDeepMerge;
