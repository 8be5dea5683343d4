//! Variable graph model.
//!
//! These types mirror the shape the design tool uses when it exports local
//! variables: collections own ordered modes, variables hold one value per
//! mode, and a value is either a primitive or an alias to another variable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variable identifier.
pub type VariableId = String;
/// Collection identifier.
pub type CollectionId = String;
/// Mode identifier.
pub type ModeId = String;

/// Primitive kind of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimitiveKind {
    Color,
    #[serde(rename = "FLOAT")]
    Number,
    String,
    Boolean,
}

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Create an opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with explicit alpha.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Marker for the alias variant of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// A reference from one variable to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRef {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: VariableId,
}

impl AliasRef {
    pub fn new(id: impl Into<VariableId>) -> Self {
        Self {
            kind: AliasKind::VariableAlias,
            id: id.into(),
        }
    }
}

/// A value stored for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Alias(AliasRef),
    Color(Rgba),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl VariableValue {
    /// Create an alias value.
    pub fn alias(id: impl Into<VariableId>) -> Self {
        Self::Alias(AliasRef::new(id))
    }

    /// The alias target, if this is an alias.
    pub fn as_alias(&self) -> Option<&str> {
        match self {
            Self::Alias(alias) => Some(&alias.id),
            _ => None,
        }
    }
}

/// A named mode within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: ModeId,
    pub name: String,
}

impl Mode {
    pub fn new(mode_id: impl Into<ModeId>, name: impl Into<String>) -> Self {
        Self {
            mode_id: mode_id.into(),
            name: name.into(),
        }
    }
}

/// A collection of variables sharing a set of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub default_mode_id: Option<ModeId>,
}

impl Collection {
    /// The default mode, falling back to the first declared mode.
    pub fn default_mode(&self) -> Option<&ModeId> {
        self.default_mode_id
            .as_ref()
            .or_else(|| self.modes.first().map(|m| &m.mode_id))
    }
}

/// A design variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    #[serde(rename = "resolvedType")]
    pub kind: PrimitiveKind,
    pub variable_collection_id: CollectionId,
    pub values_by_mode: BTreeMap<ModeId, VariableValue>,
    #[serde(default)]
    pub description: String,
}

/// Variables bound to the properties of a text style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<AliasRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<AliasRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<AliasRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<AliasRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<AliasRef>,
}

/// A text style as defined in the design tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub name: String,
    pub font_family: String,
    pub font_style: String,
    pub font_size: f64,
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub bound_variables: BoundVariables,
    #[serde(default)]
    pub description: String,
}

/// In-memory index over an exported variable graph.
#[derive(Debug, Clone, Default)]
pub struct VariableGraph {
    collections: BTreeMap<CollectionId, Collection>,
    variables: BTreeMap<VariableId, Variable>,
    text_styles: Vec<TextStyle>,
}

impl VariableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_collection(&mut self, collection: Collection) {
        self.collections.insert(collection.id.clone(), collection);
    }

    pub fn insert_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.id.clone(), variable);
    }

    pub fn push_text_style(&mut self, style: TextStyle) {
        self.text_styles.push(style);
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    /// Variables owned by the given collection.
    pub fn variables_in<'a>(&'a self, collection_id: &'a str) -> impl Iterator<Item = &'a Variable> {
        self.variables
            .values()
            .filter(move |v| v.variable_collection_id == collection_id)
    }

    pub fn text_styles(&self) -> &[TextStyle] {
        &self.text_styles
    }

    /// The mode a variable is read in outside of a theme context.
    pub fn default_mode_of<'a>(&'a self, variable: &'a Variable) -> Option<&'a ModeId> {
        match self.collection(&variable.variable_collection_id) {
            Some(collection) => collection.default_mode(),
            None => variable.values_by_mode.keys().next(),
        }
    }

    /// The value a variable holds in its default mode.
    pub fn default_value_of<'a>(&'a self, variable: &'a Variable) -> Option<&'a VariableValue> {
        let mode = self.default_mode_of(variable)?;
        variable.values_by_mode.get(mode)
    }
}
