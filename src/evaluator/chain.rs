//! Walking a property chain over a set of values
use std::collections::HashSet;

use serde_json::Value;

use crate::ast::{
    filter::Filter,
    segment::{PropertyChain, Segment},
    slice::Slice,
};
use crate::node::NodeKey;

use super::filter::FilterEvaluator;

/// Walk `chain` starting from the set `{data}`
///
/// The walk stops as soon as a segment selects nothing.
#[cfg_attr(feature = "trace", tracing::instrument(name = "Select Chain", level = "trace", parent = None, skip(filters), ret))]
pub(crate) fn select_chain<'b>(
    chain: &PropertyChain,
    data: &'b Value,
    filters: &FilterEvaluator,
) -> Vec<&'b Value> {
    let mut current = vec![data];
    for segment in &chain.segments {
        current = select_segment(segment, current, filters);
        if current.is_empty() {
            break;
        }
    }
    current
}

fn select_segment<'b>(
    segment: &Segment,
    current: Vec<&'b Value>,
    filters: &FilterEvaluator,
) -> Vec<&'b Value> {
    match segment {
        Segment::Property {
            name,
            filter,
            slice,
        } => select_property(name, filter.as_ref(), slice.as_ref(), current, filters),
        Segment::Wildcard { filter } => select_wildcard(filter.as_ref(), current, filters),
        Segment::DeepWildcard { filter } => {
            select_deep_wildcard(filter.as_ref(), current, filters)
        }
    }
}

/// Take the `name` member of every object in `current`
///
/// Array members are filtered and sliced when asked to, and their elements are spliced into
/// the result. A filtered member that is not an array is dropped.
fn select_property<'b>(
    name: &str,
    filter: Option<&Filter>,
    slice: Option<&Slice>,
    current: Vec<&'b Value>,
    filters: &FilterEvaluator,
) -> Vec<&'b Value> {
    let mut query = Vec::new();
    for value in current {
        let Some(member) = value.as_object().and_then(|obj| obj.get(name)) else {
            continue;
        };
        let elements: Vec<&'b Value> = match (filter, member.as_array()) {
            (Some(filter), Some(list)) => list.iter().filter(|v| filters.test(filter, v)).collect(),
            (Some(_), None) => continue,
            (None, Some(list)) => list.iter().collect(),
            (None, None) => {
                query.push(member);
                continue;
            }
        };
        match slice {
            Some(slice) => query.extend(
                slice
                    .indices(elements.len())
                    .into_iter()
                    .map(|i| elements[i]),
            ),
            None => query.extend(elements),
        }
    }
    query
}

fn select_wildcard<'b>(
    filter: Option<&Filter>,
    current: Vec<&'b Value>,
    filters: &FilterEvaluator,
) -> Vec<&'b Value> {
    let mut query = Vec::new();
    for value in current {
        match value {
            Value::Array(list) => query.extend(list.iter()),
            Value::Object(obj) => query.extend(obj.values()),
            _ => {}
        }
    }
    if let Some(filter) = filter {
        query.retain(|v| filters.test(filter, v));
    }
    query
}

/// Every value reachable from `current`, itself included, that satisfies the filter
///
/// Without a filter nothing is selected. Values are visited depth first, each container at
/// most once, and appear in the result at most once.
fn select_deep_wildcard<'b>(
    filter: Option<&Filter>,
    current: Vec<&'b Value>,
    filters: &FilterEvaluator,
) -> Vec<&'b Value> {
    let Some(filter) = filter else {
        return vec![];
    };
    let mut visited: HashSet<*const Value> = HashSet::new();
    let mut seen = HashSet::new();
    let mut query = Vec::new();
    let mut stack: Vec<&'b Value> = current.into_iter().rev().collect();
    while let Some(value) = stack.pop() {
        match value {
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                if !visited.insert(value as *const Value) {
                    continue;
                }
            }
            _ => {}
        }
        if filters.test(filter, value) && seen.insert(NodeKey::of(value)) {
            query.push(value);
        }
        match value {
            Value::Array(list) => stack.extend(list.iter().rev()),
            Value::Object(obj) => stack.extend(obj.values().rev()),
            _ => {}
        }
    }
    query
}
