//! Local JSON tree that mirrors a subscribed location.
//!
//! The streaming protocol sends `put` (replace at path) and `patch` (merge
//! children at path) events relative to the subscribed location. Writing
//! `null` deletes, and objects left empty by a delete disappear too.
//!
//! Collections keyed by small integers arrive as JSON arrays. Numeric
//! segments index into them; any other key turns the array into an
//! index-keyed object first.

use serde_json::{Map, Value};

/// Split a slash-separated path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Replace the value at `path`.
pub fn apply_put(root: &mut Value, path: &str, data: Value) {
    set_at(root, &segments(path), data);
}

/// Merge each child of `data` into the value at `path`.
///
/// Child keys may themselves be multi-segment paths. A non-object patch is
/// ignored.
pub fn apply_patch(root: &mut Value, path: &str, data: Value) {
    let Value::Object(children) = data else {
        return;
    };
    let base = segments(path);
    for (key, value) in children {
        let mut full: Vec<&str> = base.clone();
        full.extend(segments(&key));
        set_at(root, &full, value);
    }
}

/// Read the value at `path`, if any.
pub fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path)
        .into_iter()
        .try_fold(root, |node, segment| match node {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => node.get(segment),
        })
}

/// Object form of an array: non-null elements keyed by index.
fn index_keyed(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, value)| !value.is_null())
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}

fn set_at(node: &mut Value, path: &[&str], data: Value) {
    let Some((head, rest)) = path.split_first() else {
        *node = data;
        return;
    };

    if let Value::Array(items) = node {
        let Ok(index) = head.parse::<usize>() else {
            let entries = index_keyed(std::mem::take(items));
            *node = Value::Object(entries);
            return set_at(node, path, data);
        };
        if index >= items.len() {
            if data.is_null() {
                return;
            }
            items.resize(index + 1, Value::Null);
        }
        set_at(&mut items[index], rest, data);
        while items.last().is_some_and(Value::is_null) {
            items.pop();
        }
        if items.is_empty() {
            *node = Value::Null;
        }
        return;
    }

    if !node.is_object() {
        if data.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    let mut emptied = false;
    if let Value::Object(map) = node {
        let remove = {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            set_at(child, rest, data);
            child.is_null()
        };
        if remove {
            map.remove(*head);
        }
        emptied = map.is_empty();
    }
    if emptied {
        *node = Value::Null;
    }
}
