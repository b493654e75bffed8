//! Call-level hygiene applied after expansion.
//!
//! Real cohorts are messier than the tidy reference datasets: calls that
//! failed upstream quality filtering, and the occasional sample sequenced
//! twice so a variant carries two calls for one individual. These passes
//! filter the former and flag the latter.

use std::collections::HashSet;

use serde_json::Value;

use crate::consts::{AMBIGUOUS_CALLS_FIELD, CALL_FILTER_FIELD, PASSING_FILTER};
use crate::models::{Record, call_set_name};

/// Drop calls on a variant whose per-call `FILTER` list does not contain
/// `PASS`. Non-variant segments pass through unfiltered. A variant with no
/// calls, or left with none after filtering, is dropped entirely.
pub fn filter_failing_calls(record: Record) -> Option<Record> {
    if !record.is_variant() {
        return Some(record);
    }

    if record.calls().is_empty() {
        return None;
    }

    let passing: Vec<Value> = record
        .calls()
        .iter()
        .filter(|call| call_passes(call))
        .cloned()
        .collect();
    if passing.is_empty() {
        return None;
    }

    let mut record = record;
    record.set_calls(passing);
    Some(record)
}

fn call_passes(call: &Value) -> bool {
    call.get(CALL_FILTER_FIELD)
        .and_then(Value::as_array)
        .is_some_and(|filters| {
            filters
                .iter()
                .any(|filter| filter.as_str() == Some(PASSING_FILTER))
        })
}

/// Mark a record with `"ambiguousCalls": "true"` when any sample appears
/// more than once in its call list, `"false"` otherwise. A call without a
/// sample name counts under the empty name. Records with no calls at all
/// are dropped.
pub fn flag_ambiguous_calls(record: Record) -> Option<Record> {
    let calls = record.calls();
    if calls.is_empty() {
        return None;
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(calls.len());
    let ambiguous = calls
        .iter()
        .any(|call| !seen.insert(call_set_name(call).unwrap_or("")));

    let mut record = record;
    record.insert(
        AMBIGUOUS_CALLS_FIELD,
        Value::String(ambiguous.to_string()),
    );
    Some(record)
}
