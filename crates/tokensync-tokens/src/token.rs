//! Token values and their JSON form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*\}$").expect("valid regex"));
static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-F]{6}$").expect("valid regex"));

/// Key holding a token's type tag.
pub const TYPE_KEY: &str = "$type";
/// Key holding a token's value.
pub const VALUE_KEY: &str = "$value";
/// Key holding a token's description.
pub const DESCRIPTION_KEY: &str = "$description";

/// Declared type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Typography,
    String,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::Typography => "typography",
            Self::String => "string",
        }
    }
}

/// A token value: a literal, or a reference to another token's path.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Literal(Value),
    Reference(String),
}

impl TokenValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Reference(reference) => Value::String(reference.clone()),
        }
    }
}

/// The atomic output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: TokenValue,
    pub description: Option<String>,
}

impl Token {
    pub fn literal(token_type: TokenType, value: Value) -> Self {
        Self {
            token_type,
            value: TokenValue::Literal(value),
            description: None,
        }
    }

    pub fn reference(token_type: TokenType, reference: impl Into<String>) -> Self {
        Self {
            token_type,
            value: TokenValue::Reference(reference.into()),
            description: None,
        }
    }

    /// Attach a description; blank descriptions are dropped.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = Some(description);
        }
        self
    }

    /// Numeric literal value, used for value-ordered groups.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.value {
            TokenValue::Literal(value) => value.as_f64(),
            TokenValue::Reference(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut node = Map::new();
        node.insert(TYPE_KEY.to_string(), Value::String(self.token_type.as_str().to_string()));
        node.insert(VALUE_KEY.to_string(), self.value.to_json());
        if let Some(description) = &self.description {
            node.insert(DESCRIPTION_KEY.to_string(), Value::String(description.clone()));
        }
        Value::Object(node)
    }
}

/// Build a reference string from a dotted path.
pub fn reference_to(path: &str) -> String {
    format!("{{{path}}}")
}

/// Whether `text` is a braced reference such as `{color.foundation.blue.300}`.
pub fn is_reference(text: &str) -> bool {
    REFERENCE.is_match(text)
}

/// Whether `text` is an uppercase `#RRGGBB` color.
pub fn is_hex_color(text: &str) -> bool {
    HEX_COLOR.is_match(text)
}

/// Whether a JSON object is a token node rather than a group.
pub fn is_token_node(node: &Map<String, Value>) -> bool {
    node.contains_key(VALUE_KEY) || node.contains_key(TYPE_KEY)
}

/// Convert a number to JSON, keeping integral values integral so that
/// `16.0` renders as `16`.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
