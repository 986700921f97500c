//! Ordered, deduplicated union of two sequences.

use std::collections::HashSet;

use deepmerge_types::Value;

/// Every element of `dst` then every element of `src`, dropping any element
/// structurally equal to one already placed. First occurrence keeps its
/// position.
///
/// Membership is tracked in a hash set keyed on the values themselves, so
/// the scan is linear; output order depends only on the inputs.
pub fn union_sequences(dst: &[Value], src: &[Value]) -> Vec<Value> {
    let mut seen: HashSet<&Value> = HashSet::with_capacity(dst.len() + src.len());
    let mut out = Vec::with_capacity(dst.len() + src.len());
    for item in dst.iter().chain(src) {
        if seen.insert(item) {
            out.push(item.clone());
        }
    }
    out
}
