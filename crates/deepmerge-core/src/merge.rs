//! Recursive, policy-driven record merge.
//!
//! For every key present in the source record the engine picks exactly one
//! [`Rule`] (see [`classify`]) and applies it. Rules are tried in a fixed
//! priority order, so the outcome never depends on which policy switches
//! happen to be combined beyond what that order states.

use deepmerge_types::{Record, Value};
use tracing::{debug, trace};

use crate::policy::Policy;
use crate::union::union_sequences;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// How a single `(dst, src)` collision is settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Both sides are records: merge them key by key.
    Recurse,
    /// Source is `Null` and nulls may not override: keep the destination.
    SkipNull,
    /// Destination lacks the key: take the source value.
    Insert,
    /// Both sides are sequences: ordered deduplicated union.
    Union,
    /// Both sides are sequences: concatenation.
    Append,
    /// Both sides are non-empty sequences: merge element by element.
    Positional,
    /// Replace the destination with the source.
    Override,
    /// Keep the destination.
    Retain,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Recurse => "recurse",
            Rule::SkipNull => "skip-null",
            Rule::Insert => "insert",
            Rule::Union => "union",
            Rule::Append => "append",
            Rule::Positional => "positional",
            Rule::Override => "override",
            Rule::Retain => "retain",
        }
    }
}

/// Decide which rule settles a collision between `dst` (absent when the
/// accumulator lacks the key) and `src`.
///
/// Priority: record recursion, null skipping, insertion, sequence handling
/// (union before append before positional), then override or retain.
pub fn classify(dst: Option<&Value>, src: &Value, policy: &Policy) -> Rule {
    match (dst, src) {
        (Some(Value::Record(_)), Value::Record(_)) => Rule::Recurse,
        (_, Value::Null) if !policy.null_override => Rule::SkipNull,
        (None, _) => Rule::Insert,
        (Some(Value::Sequence(d)), Value::Sequence(s)) => {
            if policy.union_lists {
                Rule::Union
            } else if policy.append_list {
                Rule::Append
            } else if policy.deep_copy_list && !d.is_empty() && !s.is_empty() {
                Rule::Positional
            } else if policy.override_existing {
                Rule::Override
            } else {
                Rule::Retain
            }
        }
        _ if policy.override_existing => Rule::Override,
        _ => Rule::Retain,
    }
}

/// Apply `rule` to a collision. `None` means the destination stays as is.
fn apply(rule: Rule, dst: Option<&Value>, src: &Value, policy: &Policy) -> Option<Value> {
    match (rule, dst, src) {
        (Rule::Recurse, Some(Value::Record(d)), Value::Record(s)) => {
            Some(Value::Record(merge_records(d.clone(), s, policy)))
        }
        (Rule::Union, Some(Value::Sequence(d)), Value::Sequence(s)) => {
            Some(Value::Sequence(union_sequences(d, s)))
        }
        (Rule::Append, Some(Value::Sequence(d)), Value::Sequence(s)) => {
            Some(Value::Sequence(d.iter().chain(s).cloned().collect()))
        }
        (Rule::Positional, Some(Value::Sequence(d)), Value::Sequence(s)) => {
            Some(Value::Sequence(merge_positional(d, s, policy)))
        }
        (Rule::Insert | Rule::Override, _, _) => Some(src.clone()),
        _ => None,
    }
}

/// Merge two sequences index by index; the longer side's tail is kept as is.
fn merge_positional(dst: &[Value], src: &[Value], policy: &Policy) -> Vec<Value> {
    let len = dst.len().max(src.len());
    (0..len)
        .filter_map(|i| match (dst.get(i), src.get(i)) {
            (Some(d), Some(s)) => Some(merge_values(d, s, policy)),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public merge entry points
// ---------------------------------------------------------------------------

/// Merge `src` into `dst`, producing the value to store in their place.
pub fn merge_values(dst: &Value, src: &Value, policy: &Policy) -> Value {
    let rule = classify(Some(dst), src, policy);
    apply(rule, Some(dst), src, policy).unwrap_or_else(|| dst.clone())
}

/// Merge `src` into `dst` key by key.
///
/// Keys only in `dst` are carried through untouched; keys in `src` are
/// visited in record order and settled by [`classify`].
pub fn merge_records(mut dst: Record, src: &Record, policy: &Policy) -> Record {
    merge_into(&mut dst, src, policy);
    dst
}

/// Merge `src` into the owned accumulator, recursing into nested records in
/// place.
fn merge_into(dst: &mut Record, src: &Record, policy: &Policy) {
    for (key, src_value) in src {
        let rule = classify(dst.get(key), src_value, policy);
        trace!(key = %key, rule = rule.as_str(), "settled key");
        if rule == Rule::Recurse {
            if let (Some(Value::Record(d)), Value::Record(s)) = (dst.get_mut(key), src_value) {
                merge_into(d, s, policy);
            }
            continue;
        }
        if let Some(merged) = apply(rule, dst.get(key), src_value, policy) {
            dst.insert(key.clone(), merged);
        }
    }
}

/// Fold every input into an empty record, left to right.
pub fn merge_all<'a, I>(inputs: I, policy: &Policy) -> Record
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut merger = Merger::new(*policy);
    for input in inputs {
        merger.push(input);
    }
    merger.finish()
}

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// Counters describing one fold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Inputs merged into the accumulator.
    pub folded: usize,
    /// Empty inputs that contributed nothing.
    pub empty: usize,
}

/// Incremental left-to-right fold over records.
#[derive(Clone, Debug)]
pub struct Merger {
    policy: Policy,
    acc: Record,
    stats: MergeStats,
}

impl Merger {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            acc: Record::new(),
            stats: MergeStats::default(),
        }
    }

    /// Merge the next input into the accumulator.
    pub fn push(&mut self, input: &Record) {
        let index = self.stats.folded + self.stats.empty + 1;
        if input.is_empty() {
            self.stats.empty += 1;
            debug!(index, "skipping empty input");
            return;
        }
        self.acc = merge_records(std::mem::take(&mut self.acc), input, &self.policy);
        self.stats.folded += 1;
        debug!(index, keys = input.len(), total_keys = self.acc.len(), "merged input");
    }

    /// The accumulated result so far.
    pub fn current(&self) -> &Record {
        &self.acc
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Consume the merger, returning the merge result.
    pub fn finish(self) -> Record {
        self.acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Value::from(value).into_record().unwrap()
    }

    fn merge(inputs: &[serde_json::Value], policy: Policy) -> serde_json::Value {
        let records: Vec<Record> = inputs.iter().cloned().map(record).collect();
        Value::Record(merge_all(&records, &policy)).into()
    }

    fn policy(f: impl FnOnce(&mut Policy)) -> Policy {
        let mut p = Policy::default();
        f(&mut p);
        p
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn classify_priority_order() {
        let p = Policy::default();
        let rec = Value::from(json!({}));
        let seq = Value::from(json!([1]));
        assert_eq!(classify(Some(&rec), &rec, &p), Rule::Recurse);
        assert_eq!(classify(None, &rec, &p), Rule::Insert);
        assert_eq!(classify(Some(&seq), &seq, &p), Rule::Override);
        assert_eq!(classify(Some(&rec), &seq, &p), Rule::Override);

        let no_null = policy(|p| p.null_override = false);
        assert_eq!(classify(None, &Value::Null, &no_null), Rule::SkipNull);
        assert_eq!(classify(Some(&rec), &Value::Null, &no_null), Rule::SkipNull);
        assert_eq!(classify(Some(&rec), &Value::Null, &p), Rule::Override);
    }

    #[test]
    fn classify_sequence_switches() {
        let seq = Value::from(json!([1]));
        let empty = Value::from(json!([]));
        let all = policy(|p| {
            p.union_lists = true;
            p.append_list = true;
            p.deep_copy_list = true;
        });
        assert_eq!(classify(Some(&seq), &seq, &all), Rule::Union);

        let append = policy(|p| {
            p.append_list = true;
            p.deep_copy_list = true;
        });
        assert_eq!(classify(Some(&seq), &seq, &append), Rule::Append);

        let deep = policy(|p| p.deep_copy_list = true);
        assert_eq!(classify(Some(&seq), &seq, &deep), Rule::Positional);
        assert_eq!(classify(Some(&empty), &seq, &deep), Rule::Override);
        assert_eq!(classify(Some(&seq), &empty, &deep), Rule::Override);

        let keep = policy(|p| p.override_existing = false);
        assert_eq!(classify(Some(&seq), &seq, &keep), Rule::Retain);
    }

    // -----------------------------------------------------------------------
    // Scalars and records
    // -----------------------------------------------------------------------

    #[test]
    fn last_writer_wins_by_default() {
        let out = merge(&[json!({"a": 1}), json!({"a": 2}), json!({"a": 3})], Policy::default());
        assert_eq!(out, json!({"a": 3}));
    }

    #[test]
    fn absent_keys_survive() {
        let out = merge(&[json!({"a": 1, "b": 2}), json!({"a": 9})], Policy::default());
        assert_eq!(out, json!({"a": 9, "b": 2}));
    }

    #[test]
    fn nested_records_merge() {
        let out = merge(
            &[
                json!({"x1": {"y1": true, "y2": 1}}),
                json!({"x1": {"y2": 2, "y3": [1, 2, 3]}, "x2": {"y4": {"a": "hello", "b": "world"}}}),
                json!({"x1": {"y1": false, "y3": [4, 5, 6]}, "x2": {"y4": {"b": "mergo", "c": ["a", 2, ["b"]]}}}),
            ],
            Policy::default(),
        );
        assert_eq!(
            out,
            json!({
                "x1": {"y1": false, "y2": 2, "y3": [4, 5, 6]},
                "x2": {"y4": {"a": "hello", "b": "mergo", "c": ["a", 2, ["b"]]}}
            })
        );
    }

    #[test]
    fn no_override_keeps_first_but_fills_gaps() {
        let out = merge(
            &[
                json!({"x1": {"y1": true, "y2": 1}}),
                json!({"x1": {"y2": 2, "y3": [1, 2, 3]}, "x2": {"y4": {"a": "hello", "b": "world"}}}),
                json!({"x1": {"y1": false, "y3": [4, 5, 6]}, "x2": {"y4": {"b": "mergo", "c": ["a", 2, ["b"]]}}}),
            ],
            policy(|p| p.override_existing = false),
        );
        assert_eq!(
            out,
            json!({
                "x1": {"y1": true, "y2": 1, "y3": [1, 2, 3]},
                "x2": {"y4": {"a": "hello", "b": "world", "c": ["a", 2, ["b"]]}}
            })
        );
    }

    #[test]
    fn no_override_retains_explicit_null() {
        let out = merge(&[json!({"a": null}), json!({"a": 1})], policy(|p| p.override_existing = false));
        assert_eq!(out, json!({"a": null}));
    }

    #[test]
    fn kind_mismatch_overrides() {
        let out = merge(
            &[json!({"a": {"x": 1}, "b": [1], "c": "s"}), json!({"a": 42, "b": {"y": 2}, "c": [1]})],
            Policy::default(),
        );
        assert_eq!(out, json!({"a": 42, "b": {"y": 2}, "c": [1]}));
    }

    #[test]
    fn record_replaces_scalar_wholesale() {
        let out = merge(&[json!({"a": "bar"}), json!({"a": {"z": null, "w": 1}})], policy(|p| p.null_override = false));
        assert_eq!(out, json!({"a": {"z": null, "w": 1}}));
    }

    // -----------------------------------------------------------------------
    // Null handling
    // -----------------------------------------------------------------------

    #[test]
    fn null_overrides_by_default() {
        let out = merge(&[json!({"a": 1}), json!({"a": null})], Policy::default());
        assert_eq!(out, json!({"a": null}));
    }

    #[test]
    fn null_override_disabled_keeps_last_value() {
        let out = merge(&[json!({"a": 1}), json!({"a": null})], policy(|p| p.null_override = false));
        assert_eq!(out, json!({"a": 1}));
    }

    #[test]
    fn null_override_disabled_deep() {
        let out = merge(
            &[
                json!({"x1": {"y2": {"z1": 1, "z2": 2}}, "x2": {"s1": "hello", "s2": "world", "s3": null}, "x3": {"t1": "foo"}}),
                json!({"x1": {"y2": "bar"}, "x3": {"t1": null}}),
                json!({"x1": {"y2": null}}),
                json!({"x1": {"y1": 4}}),
                json!({
                    "x1": {"y2": {"z1": {"n1": 1, "n2": {"m1": 1}}, "z2": null, "z3": null, "z4": 4}},
                    "x2": {"s2": "mergo", "s4": "today"},
                    "x3": {"t2": "foz"}
                }),
            ],
            policy(|p| p.null_override = false),
        );
        assert_eq!(
            out,
            json!({
                "x1": {"y1": 4, "y2": {"z1": {"n1": 1, "n2": {"m1": 1}}, "z2": null, "z3": null, "z4": 4}},
                "x2": {"s1": "hello", "s2": "mergo", "s3": null, "s4": "today"},
                "x3": {"t1": "foo", "t2": "foz"}
            })
        );
    }

    #[test]
    fn top_level_null_dropped_without_null_override() {
        let out = merge(&[json!({"a": null, "b": 1})], policy(|p| p.null_override = false));
        assert_eq!(out, json!({"b": 1}));
    }

    // -----------------------------------------------------------------------
    // Sequences
    // -----------------------------------------------------------------------

    #[test]
    fn sequences_replace_by_default() {
        let out = merge(&[json!({"x": [1, 2, 3]}), json!({"x": []})], Policy::default());
        assert_eq!(out, json!({"x": []}));
    }

    #[test]
    fn append_list_concatenates() {
        let out = merge(&[json!({"x": [1, 2]}), json!({"x": [3, 2]})], policy(|p| p.append_list = true));
        assert_eq!(out, json!({"x": [1, 2, 3, 2]}));
    }

    #[test]
    fn union_lists_dedups() {
        let out = merge(&[json!({"x": [1, 2]}), json!({"x": [2, 3]})], policy(|p| p.union_lists = true));
        assert_eq!(out, json!({"x": [1, 2, 3]}));
    }

    #[test]
    fn union_beats_append() {
        let out = merge(
            &[json!({"x": [1, 2]}), json!({"x": [2, 3]})],
            policy(|p| {
                p.union_lists = true;
                p.append_list = true;
            }),
        );
        assert_eq!(out, json!({"x": [1, 2, 3]}));
    }

    #[test]
    fn deep_copy_merges_elements() {
        let out = merge(
            &[json!({"y": [{"a": 1, "b": 2}]}), json!({"y": [{"b": 3, "c": 4}]})],
            policy(|p| p.deep_copy_list = true),
        );
        assert_eq!(out, json!({"y": [{"a": 1, "b": 3, "c": 4}]}));
    }

    #[test]
    fn deep_copy_keeps_longer_tail() {
        let out = merge(
            &[
                json!({"resources": [
                    {"name": "res1", "props": {"size": "small", "region": "us-east"}},
                    {"name": "res2", "props": {"size": "large"}}
                ]}),
                json!({"resources": [{"name": "res1", "props": {"region": "us-west", "tier": "premium"}}]}),
            ],
            policy(|p| p.deep_copy_list = true),
        );
        assert_eq!(
            out,
            json!({"resources": [
                {"name": "res1", "props": {"size": "small", "region": "us-west", "tier": "premium"}},
                {"name": "res2", "props": {"size": "large"}}
            ]})
        );

        let out = merge(&[json!({"v": [1]}), json!({"v": [7, 8, 9]})], policy(|p| p.deep_copy_list = true));
        assert_eq!(out, json!({"v": [7, 8, 9]}));
    }

    #[test]
    fn deep_copy_recurses_through_nested_sequences() {
        let out = merge(
            &[
                json!({"nested": [{"level1": {"level2": [{"value": "a"}]}}]}),
                json!({"nested": [{"level1": {"level2": [{"value": "b", "extra": "field"}]}}]}),
            ],
            policy(|p| p.deep_copy_list = true),
        );
        assert_eq!(
            out,
            json!({"nested": [{"level1": {"level2": [{"value": "b", "extra": "field"}]}}]})
        );
    }

    #[test]
    fn deep_copy_with_empty_side_replaces() {
        let out = merge(&[json!({"v": [1, 2]}), json!({"v": []})], policy(|p| p.deep_copy_list = true));
        assert_eq!(out, json!({"v": []}));
    }

    #[test]
    fn append_beats_deep_copy_and_does_not_merge_elements() {
        let out = merge(
            &[
                json!({"x1": {"y1": [{"x2": {"y1": "foo", "y2": ["foo"]}}]}}),
                json!({"x1": {"y1": [{"x2": {"y1": "bar", "y2": ["bar"]}}]}}),
            ],
            policy(|p| {
                p.deep_copy_list = true;
                p.append_list = true;
            }),
        );
        assert_eq!(
            out,
            json!({"x1": {"y1": [
                {"x2": {"y1": "foo", "y2": ["foo"]}},
                {"x2": {"y1": "bar", "y2": ["bar"]}}
            ]}})
        );
    }

    #[test]
    fn union_applies_in_nested_records() {
        let out = merge(
            &[json!({"a": {"tags": ["x", "y"]}}), json!({"a": {"tags": ["y", "z"]}})],
            policy(|p| p.union_lists = true),
        );
        assert_eq!(out, json!({"a": {"tags": ["x", "y", "z"]}}));
    }

    // -----------------------------------------------------------------------
    // Driver
    // -----------------------------------------------------------------------

    #[test]
    fn empty_inputs_are_noops() {
        let out = merge(&[json!({}), json!({"a": 1}), json!({})], Policy::default());
        assert_eq!(out, json!({"a": 1}));
        assert_eq!(merge(&[], Policy::default()), json!({}));
    }

    #[test]
    fn merger_counts_inputs() {
        let mut merger = Merger::new(Policy::default());
        merger.push(&record(json!({"a": 1})));
        merger.push(&Record::new());
        merger.push(&record(json!({"b": 2})));
        assert_eq!(merger.stats(), MergeStats { folded: 2, empty: 1 });
        assert_eq!(merger.current().len(), 2);
        assert_eq!(Value::Record(merger.finish()), Value::from(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn merge_records_consumes_accumulator_in_place() {
        let acc = record(json!({"keep": 1, "n": {"deep": {"a": 1}, "side": true}}));
        let src = record(json!({"n": {"deep": {"b": 2}}}));
        let out = merge_records(acc, &src, &Policy::default());
        assert_eq!(
            Value::Record(out),
            Value::from(json!({"keep": 1, "n": {"deep": {"a": 1, "b": 2}, "side": true}}))
        );
        assert_eq!(src, record(json!({"n": {"deep": {"b": 2}}})));
    }

    #[test]
    fn merger_accumulator_survives_many_pushes() {
        let mut merger = Merger::new(policy(|p| p.append_list = true));
        for i in 0..5i64 {
            merger.push(&record(json!({"r": {"seq": [i]}, "last": i})));
        }
        assert_eq!(
            Value::Record(merger.finish()),
            Value::from(json!({"r": {"seq": [0, 1, 2, 3, 4]}, "last": 4}))
        );
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = record(json!({"x": {"y": [1]}}));
        let b = record(json!({"x": {"y": [2], "z": 3}}));
        let before = (a.clone(), b.clone());
        let _ = merge_all([&a, &b], &policy(|p| p.append_list = true));
        assert_eq!((a, b), before);
    }
}
