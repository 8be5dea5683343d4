//! Canonical sibling order per file.

use crate::builder::typography::COMPOSITE_KEYS;
use crate::file::TokenFileId;
use crate::serialize::{KeyOrder, NodePath};
use crate::taxonomy::{
    TypographyKind, ATTACHMENT_COLORS, COLOR_FAMILIES, RADIUS_SIZES, SPACING_SIZES,
    TEXT_STYLE_GROUPS,
};
use crate::token::{is_token_node, DESCRIPTION_KEY, TYPE_KEY, VALUE_KEY};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Key order inside a token node.
pub const TOKEN_KEYS: [&str; 3] = [TYPE_KEY, VALUE_KEY, DESCRIPTION_KEY];

/// Compute the key order of every object node in a built tree.
pub fn build_order(file: TokenFileId, tree: &Value) -> KeyOrder {
    let mut order = KeyOrder::new();
    if let Value::Object(node) = tree {
        walk(file, Vec::new(), node, &mut order);
    }
    order
}

fn walk(file: TokenFileId, path: NodePath, node: &Map<String, Value>, order: &mut KeyOrder) {
    if is_token_node(node) {
        order.set(path.clone(), to_owned(&TOKEN_KEYS));
        if let Some(Value::Object(_)) = node.get(VALUE_KEY) {
            let mut composite = path;
            composite.push(VALUE_KEY.to_string());
            order.set(composite, to_owned(&COMPOSITE_KEYS));
        }
        return;
    }

    let root = file.root();
    if path.len() >= root.len() {
        order.set(path.clone(), child_order(file, &path[root.len()..], node));
    }

    for (key, child) in node {
        if let Value::Object(child) = child {
            let mut child_path = path.clone();
            child_path.push(key.clone());
            walk(file, child_path, child, order);
        }
    }
}

fn to_owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

/// Order of the children of the group at `relative` (path below the root).
pub fn child_order(file: TokenFileId, relative: &[String], node: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = node.keys().cloned().collect();

    match (file, relative) {
        (TokenFileId::FoundationColor, []) => sort_by_rank(&mut keys, |k| enumerated(&COLOR_FAMILIES, k)),
        (TokenFileId::FoundationColor, [_]) => sort_by_rank(&mut keys, numeric_key),
        (TokenFileId::FoundationRadius, []) => sort_by_rank(&mut keys, |k| enumerated(&RADIUS_SIZES, k)),
        (TokenFileId::FoundationSpacing, []) => sort_by_rank(&mut keys, |k| enumerated(&SPACING_SIZES, k)),
        (TokenFileId::SemanticAttachment, []) => {
            sort_by_rank(&mut keys, |k| enumerated(&ATTACHMENT_COLORS, k))
        }
        (TokenFileId::FoundationTypography, []) => {
            sort_by_rank(&mut keys, |k| {
                TypographyKind::ALL
                    .iter()
                    .position(|kind| kind.group() == k)
                    .map(|i| i as f64)
            })
        }
        (TokenFileId::FoundationTypography, [group]) => match TypographyKind::from_group(group) {
            Some(TypographyKind::FontSize | TypographyKind::LineHeight) => {
                sort_by_rank(&mut keys, numeric_key)
            }
            Some(TypographyKind::FontWeight | TypographyKind::LetterSpacing) => {
                sort_by_rank(&mut keys, |k| token_number(node, k))
            }
            _ => keys.sort(),
        },
        (TokenFileId::SemanticTypography, []) => {
            sort_by_rank(&mut keys, |k| enumerated(&TEXT_STYLE_GROUPS, k))
        }
        (TokenFileId::SemanticTypography, [_]) => keys.sort_by(|a, b| compare_style_keys(a, b)),
        _ => keys.sort(),
    }
    keys
}

/// Keep the remote order for keys that exist on both sides and append new
/// keys alphabetically.
pub fn merge_remote_order(node: &Map<String, Value>, remote: Option<&[String]>) -> Vec<String> {
    let mut keys: Vec<String> = remote
        .unwrap_or_default()
        .iter()
        .filter(|key| node.contains_key(key.as_str()))
        .cloned()
        .collect();

    let mut added: Vec<String> = node
        .keys()
        .filter(|key| !keys.contains(*key))
        .cloned()
        .collect();
    added.sort();
    keys.extend(added);
    keys
}

/// Sort by rank ascending; unranked keys go last, alphabetically.
fn sort_by_rank(keys: &mut [String], rank: impl Fn(&str) -> Option<f64>) {
    keys.sort_by(|a, b| match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
}

fn enumerated(table: &[&str], key: &str) -> Option<f64> {
    table.iter().position(|k| *k == key).map(|i| i as f64)
}

fn numeric_key(key: &str) -> Option<f64> {
    key.parse::<f64>().ok()
}

fn token_number(group: &Map<String, Value>, key: &str) -> Option<f64> {
    group.get(key)?.get(VALUE_KEY)?.as_f64()
}

/// `700` sorts before `700-italic`, which sorts before `700-regular`;
/// sizes compare numerically.
fn compare_style_keys(a: &str, b: &str) -> Ordering {
    let (size_a, variant_a) = split_style_key(a);
    let (size_b, variant_b) = split_style_key(b);
    let by_size = match (size_a.parse::<u64>(), size_b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => size_a.cmp(size_b),
    };
    by_size.then_with(|| variant_a.cmp(&variant_b))
}

fn split_style_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('-') {
        Some((size, variant)) => (size, Some(variant)),
        None => (key, None),
    }
}
