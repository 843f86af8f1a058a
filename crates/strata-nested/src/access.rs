use serde_json::{Map, Value};
use strata_core::{OptionPath, Result, StrataError};

use crate::Tree;

/// Look up the value at `path`.
///
/// Objects are entered by key and arrays by index (`"tags.0"`). Returns
/// `None` as soon as a level is missing or is a scalar. Nothing is created.
pub fn get<'a>(tree: &'a Tree, path: &OptionPath) -> Option<&'a Value> {
    let mut node = tree.get(path.head())?;
    for segment in &path.segments()[1..] {
        node = child(node, segment)?;
    }
    Some(node)
}

/// Mutable variant of [`get`].
pub fn get_mut<'a>(tree: &'a mut Tree, path: &OptionPath) -> Option<&'a mut Value> {
    let mut node = tree.get_mut(path.head())?;
    for segment in &path.segments()[1..] {
        node = child_mut(node, segment)?;
    }
    Some(node)
}

/// True if the full path resolves to a present key or array element.
///
/// Presence is about the key, not the value: `null`, `0`, `""` and `false`
/// all count as present.
pub fn has(tree: &Tree, path: &OptionPath) -> bool {
    get(tree, path).is_some()
}

/// Store `value` at `path`, creating intermediate objects as needed.
///
/// The final segment is overwritten whatever it held. Arrays along the way
/// are written in place: an index inside the array replaces that element
/// and an index equal to its length appends. Any other segment on an array
/// fails with `PathConflict` and leaves the array untouched. A scalar
/// intermediate is replaced by an empty object. Returns the value
/// previously stored at `path`.
pub fn set(tree: &mut Tree, path: &OptionPath, value: Value) -> Result<Option<Value>> {
    let rest = &path.segments()[1..];
    if rest.is_empty() {
        return Ok(tree.insert(path.head().to_string(), value));
    }
    let node = tree.entry(path.head()).or_insert_with(empty_object);
    set_in(node, path, rest, value)
}

/// Delete the key at `path` if it is present. Missing levels are a no-op,
/// so removing twice is the same as removing once.
///
/// Paths may pass through arrays, but an array element itself is never
/// removed: shifting the remaining elements would change what every later
/// index addresses. Sibling order is preserved.
pub fn remove(tree: &mut Tree, path: &OptionPath) -> Option<Value> {
    let (parents, leaf) = path.split_leaf();
    let Some((head, rest)) = parents.split_first() else {
        return tree.shift_remove(leaf);
    };
    let mut node = tree.get_mut(head.as_str())?;
    for segment in rest {
        node = child_mut(node, segment)?;
    }
    match node {
        Value::Object(map) => map.shift_remove(leaf),
        _ => None,
    }
}

fn set_in(
    node: &mut Value,
    path: &OptionPath,
    segments: &[String],
    value: Value,
) -> Result<Option<Value>> {
    let segment = &segments[0];
    let rest = &segments[1..];

    if let Value::Array(items) = node {
        let len = items.len();
        let index = array_index(segment)
            .filter(|&i| i <= len)
            .ok_or_else(|| {
                StrataError::path_conflict(
                    path.to_string(),
                    format!("'{}' does not index an array of length {}", segment, len),
                )
            })?;
        if index == len {
            if rest.is_empty() {
                items.push(value);
                return Ok(None);
            }
            items.push(empty_object());
        } else if rest.is_empty() {
            return Ok(Some(std::mem::replace(&mut items[index], value)));
        }
        return set_in(&mut items[index], path, rest, value);
    }

    let map = ensure_object(node);
    if rest.is_empty() {
        return Ok(map.insert(segment.clone(), value));
    }
    let child = map.entry(segment.clone()).or_insert_with(empty_object);
    set_in(child, path, rest, value)
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(array_index(segment)?),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => items.get_mut(array_index(segment)?),
        _ => None,
    }
}

/// Canonical decimal index: `"0"`, `"12"`; not `"01"`, `"+1"` or `"-1"`.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = segment == "0"
        || (!segment.starts_with('0') && segment.bytes().all(|b| b.is_ascii_digit()));
    if canonical { segment.parse().ok() } else { None }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn ensure_object(value: &mut Value) -> &mut Tree {
    if !value.is_object() {
        *value = empty_object();
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}
