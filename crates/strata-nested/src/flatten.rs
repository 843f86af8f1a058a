use serde_json::Value;
use strata_core::{OptionPath, Result};

use crate::Tree;

/// Every leaf of `tree` paired with its full path, in insertion order.
///
/// Non-object values and empty objects are leaves. Fails with `InvalidPath`
/// if a key cannot be used as a path segment (empty, or containing `.`).
pub fn flatten(tree: &Tree) -> Result<Vec<(OptionPath, Value)>> {
    let mut leaves = Vec::new();
    for (key, value) in tree {
        let path = OptionPath::key(key.as_str())?;
        collect(path, value, &mut leaves)?;
    }
    Ok(leaves)
}

fn collect(path: OptionPath, value: &Value, leaves: &mut Vec<(OptionPath, Value)>) -> Result<()> {
    match value {
        Value::Object(children) if !children.is_empty() => {
            for (key, child) in children {
                collect(path.child(key.as_str())?, child, leaves)?;
            }
        }
        _ => leaves.push((path, value.clone())),
    }
    Ok(())
}
