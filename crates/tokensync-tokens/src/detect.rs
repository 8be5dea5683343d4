//! Leaf-by-leaf change detection against the published snapshot.

use crate::file::TokenFileId;
use crate::token::{is_token_node, VALUE_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// A file whose content differs from the published one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub file: TokenFileId,
    /// Dotted path of the first differing leaf.
    pub first_difference: String,
}

/// Files that must be rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<FileChange>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn files(&self) -> impl Iterator<Item = TokenFileId> + '_ {
        self.changes.iter().map(|c| c.file)
    }

    pub fn contains(&self, file: TokenFileId) -> bool {
        self.changes.iter().any(|c| c.file == file)
    }
}

/// Compare each non-empty new tree with its current counterpart.
///
/// A missing current tree counts as empty. Comparison stops at the first
/// differing leaf of each file.
pub fn detect_changes(
    new: &BTreeMap<TokenFileId, Value>,
    current: &BTreeMap<TokenFileId, Value>,
) -> ChangeSet {
    let empty = BTreeMap::new();
    let mut changes = Vec::new();

    for (file, tree) in new {
        let new_leaves = leaves(tree);
        if new_leaves.is_empty() {
            continue;
        }
        let current_leaves = current.get(file).map(leaves);
        let current_leaves = current_leaves.as_ref().unwrap_or(&empty);

        if let Some(path) = first_difference(&new_leaves, current_leaves) {
            tracing::debug!(file = %file, path = %path, "file changed");
            changes.push(FileChange {
                file: *file,
                first_difference: path,
            });
        }
    }

    ChangeSet { changes }
}

fn first_difference(
    new: &BTreeMap<String, &Value>,
    current: &BTreeMap<String, &Value>,
) -> Option<String> {
    let paths: BTreeSet<&String> = new.keys().chain(current.keys()).collect();
    paths
        .into_iter()
        .find(|path| match (new.get(*path), current.get(*path)) {
            (Some(a), Some(b)) => !values_equal(a, b),
            _ => true,
        })
        .cloned()
}

/// Leaves of a tree keyed by dotted path.
///
/// Scalars and arrays are leaves. A token's `$value` is a single leaf even
/// when it is a composite object.
pub fn leaves(tree: &Value) -> BTreeMap<String, &Value> {
    let mut out = BTreeMap::new();
    collect(tree, String::new(), &mut out);
    out
}

fn collect<'a>(node: &'a Value, path: String, out: &mut BTreeMap<String, &'a Value>) {
    match node {
        Value::Object(map) => {
            let token = is_token_node(map);
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                if token && key == VALUE_KEY {
                    out.insert(child_path, child);
                } else {
                    collect(child, child_path, out);
                }
            }
        }
        leaf => {
            out.insert(path, leaf);
        }
    }
}

/// Structural equality with numbers compared by value, so `16` equals
/// `16.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn color(shade_value: &str) -> Value {
        json!({ "color": { "foundation": { "blue": { "500": {
            "$type": "color", "$value": shade_value
        } } } } })
    }

    #[test]
    fn test_changed_leaf_is_detected() {
        let new = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        let current = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D7"))]);
        let changes = detect_changes(&new, &current);

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes.changes[0].first_difference,
            "color.foundation.blue.500.$value"
        );
    }

    #[test]
    fn test_identical_trees_do_not_change() {
        let new = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        assert!(detect_changes(&new, &new.clone()).is_empty());
    }

    #[test]
    fn test_missing_remote_counts_as_empty() {
        let new = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        let changes = detect_changes(&new, &BTreeMap::new());
        assert!(changes.contains(TokenFileId::FoundationColor));
    }

    #[test]
    fn test_files_without_leaves_are_not_compared() {
        let new = BTreeMap::from([(TokenFileId::FoundationColor, TokenFileId::FoundationColor.skeleton())]);
        let current = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        assert!(detect_changes(&new, &current).is_empty());
    }

    #[test]
    fn test_removed_leaf_is_a_change() {
        let mut with_extra = color("#1C58D9");
        with_extra["color"]["foundation"]["blue"]["600"] = json!({ "$type": "color", "$value": "#000000" });
        let new = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        let current = BTreeMap::from([(TokenFileId::FoundationColor, with_extra)]);

        let changes = detect_changes(&new, &current);
        assert_eq!(changes.changes[0].first_difference, "color.foundation.blue.600.$type");
    }

    #[test]
    fn test_numbers_compare_numerically_and_composites_structurally() {
        assert!(values_equal(&json!(16), &json!(16.0)));
        assert!(!values_equal(&json!(16), &json!("16")));
        assert!(values_equal(
            &json!({ "fontSize": 14, "fontFamily": ["Inter"] }),
            &json!({ "fontFamily": ["Inter"], "fontSize": 14.0 })
        ));
        assert!(!values_equal(&json!({ "fontSize": 14 }), &json!({ "fontSize": 14, "lineHeight": 20 })));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let new = BTreeMap::from([(TokenFileId::FoundationColor, color("#1C58D9"))]);
        let current = BTreeMap::from([(TokenFileId::FoundationColor, color("#000000"))]);
        let (new_before, current_before) = (new.clone(), current.clone());
        detect_changes(&new, &current);
        assert_eq!(new, new_before);
        assert_eq!(current, current_before);
    }
}
