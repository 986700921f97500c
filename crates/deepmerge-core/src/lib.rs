//! Merge engine for deepmerge.
//!
//! Folds an ordered sequence of records into one, left to right, under a
//! [`Policy`] of five independent switches. Records merge recursively;
//! sequences are replaced, concatenated, unioned, or merged positionally
//! depending on the policy; every other collision is settled by override.
//!
//! # Quick Start
//!
//! ```rust
//! use deepmerge_core::{merge_all, Policy};
//! use deepmerge_types::{Record, Value};
//!
//! let a: Record = [("x".to_string(), Value::from(1i64))].into_iter().collect();
//! let b: Record = [("x".to_string(), Value::from(2i64))].into_iter().collect();
//! let merged = merge_all([&a, &b], &Policy::default());
//! assert_eq!(merged.get("x"), Some(&Value::from(2i64)));
//! ```
//!
//! The engine is total: once inputs are records and the policy is resolved,
//! merging cannot fail. Errors only arise while resolving policy overrides.

pub mod error;
pub mod merge;
pub mod policy;
pub mod union;

pub use error::{PolicyError, PolicyResult};
pub use merge::{classify, merge_all, merge_records, merge_values, MergeStats, Merger, Rule};
pub use policy::{Policy, PolicyOverrides};
pub use union::union_sequences;
