//! Foundation types for deepmerge.
//!
//! This crate provides the dynamic value model every other deepmerge crate
//! operates on: a closed tagged variant over null, scalars, sequences, and
//! string-keyed records. Values are plain trees; they never alias and are
//! never mutated by the merge engine.
//!
//! # Key Types
//!
//! - [`Value`] — The dynamic value (`Null | Bool | Number | String | Sequence | Record`)
//! - [`Record`] — String-keyed map of values, iterated in sorted key order
//! - [`Kind`] — The variant tag of a [`Value`], used in error messages
//! - [`Number`] — Finite integer or float scalar (re-exported from `serde_json`)

pub mod de;
pub mod error;
pub mod value;

pub use error::TypeError;
pub use serde_json::Number;
pub use value::{Kind, Record, Value};
