//! Ordered JSON rendering.
//!
//! `serde_json::Value` does not carry key order, so order travels next to
//! the tree in a [`KeyOrder`]: node path -> ordered child keys. Rendering
//! honours it; parsing records it, which lets a fetched remote document
//! report the order its keys were written in.

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Path from the document root to a node, one segment per object key.
pub type NodePath = Vec<String>;

/// Explicit key order for the object nodes of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOrder {
    nodes: BTreeMap<NodePath, Vec<String>>,
}

impl KeyOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the key order for the node at `path`.
    pub fn set(&mut self, path: NodePath, keys: Vec<String>) {
        self.nodes.insert(path, keys);
    }

    pub fn get(&self, path: &[String]) -> Option<&[String]> {
        self.nodes.get(path).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Keys of `node` in emission order: registered keys that exist first,
    /// then the rest lexicographically.
    pub fn ordered_keys<'a>(&self, path: &[String], node: &'a Map<String, Value>) -> Vec<&'a String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(node.len());

        if let Some(registered) = self.get(path) {
            for key in registered {
                if let Some((stored, _)) = node.get_key_value(key) {
                    if seen.insert(stored.as_str()) {
                        keys.push(stored);
                    }
                }
            }
        }

        let mut rest: Vec<&String> = node
            .keys()
            .filter(|key| !seen.contains(key.as_str()))
            .collect();
        rest.sort();
        keys.extend(rest);
        keys
    }
}

/// Render `tree` as two-space indented JSON with a trailing newline.
pub fn serialize(tree: &Value, order: &KeyOrder) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&Ordered {
        value: tree,
        path: Vec::new(),
        order,
    })?;
    text.push('\n');
    Ok(text)
}

struct Ordered<'a> {
    value: &'a Value,
    path: NodePath,
    order: &'a KeyOrder,
}

impl Serialize for Ordered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Object(node) => {
                let keys = self.order.ordered_keys(&self.path, node);
                let mut map = serializer.serialize_map(Some(keys.len()))?;
                for key in keys {
                    let mut path = self.path.clone();
                    path.push(key.clone());
                    map.serialize_entry(
                        key,
                        &Ordered {
                            value: &node[key.as_str()],
                            path,
                            order: self.order,
                        },
                    )?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for (index, item) in items.iter().enumerate() {
                    let mut path = self.path.clone();
                    path.push(index.to_string());
                    seq.serialize_element(&Ordered {
                        value: item,
                        path,
                        order: self.order,
                    })?;
                }
                seq.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

/// Parse a JSON document, recording the key order of every object node.
pub fn parse_ordered(text: &str) -> Result<(Value, KeyOrder), serde_json::Error> {
    let mut order = KeyOrder::new();
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = NodeSeed {
        path: Vec::new(),
        order: &mut order,
    }
    .deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok((value, order))
}

struct NodeSeed<'a> {
    path: NodePath,
    order: &'a mut KeyOrder,
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = Value;

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for NodeSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let NodeSeed { path, order } = self;
        let mut items = Vec::new();
        loop {
            let mut child = path.clone();
            child.push(items.len().to_string());
            match seq.next_element_seed(NodeSeed {
                path: child,
                order: &mut *order,
            })? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let NodeSeed { path, order } = self;
        let mut node = Map::new();
        let mut keys = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let mut child = path.clone();
            child.push(key.clone());
            let value = map.next_value_seed(NodeSeed {
                path: child,
                order: &mut *order,
            })?;
            if !node.contains_key(&key) {
                keys.push(key.clone());
            }
            node.insert(key, value);
        }
        if !keys.is_empty() {
            order.set(path, keys);
        }
        Ok(Value::Object(node))
    }
}
