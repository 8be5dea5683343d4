//! Typography value normalization and text-style composites.

use crate::resolver::{resolve_alias, Literal};
pub use crate::taxonomy::normalize_name;
use crate::taxonomy::{TextStyleName, TypographyKind};
use crate::token::{number_value, reference_to, Token, TokenType};
use crate::variable::{AliasRef, TextStyle, VariableGraph};
use serde_json::{Map, Value};

/// Named font weights.
pub const WEIGHT_NAMES: [(&str, u32); 9] = [
    ("thin", 100),
    ("extralight", 200),
    ("light", 300),
    ("regular", 400),
    ("medium", 500),
    ("semibold", 600),
    ("bold", 700),
    ("extrabold", 800),
    ("black", 900),
];

/// Named letter spacings.
pub const LETTER_SPACING_NAMES: [(&str, f64); 3] = [("tight", -0.5), ("normal", 0.0), ("wide", 0.5)];

/// Composite member keys in emission order.
pub const COMPOSITE_KEYS: [&str; 5] = [
    "fontFamily",
    "fontSize",
    "fontWeight",
    "lineHeight",
    "letterSpacing",
];

pub fn weight_for_name(name: &str) -> Option<u32> {
    let normalized = normalize_name(name);
    WEIGHT_NAMES
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, weight)| *weight)
}

pub fn letter_spacing_for_name(name: &str) -> Option<f64> {
    let normalized = normalize_name(name);
    LETTER_SPACING_NAMES
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, spacing)| *spacing)
}

/// Font weight from a resolved literal. Numbers pass through; strings are
/// either numeric weights in `[100, 900]` or names from [`WEIGHT_NAMES`].
pub fn normalize_weight(literal: &Literal) -> Option<Value> {
    match literal {
        Literal::Number(n) => Some(number_value(*n)),
        Literal::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<u32>() {
                Ok(weight) if (100..=900).contains(&weight) => Some(Value::from(weight)),
                Ok(_) => None,
                Err(_) => weight_for_name(trimmed).map(Value::from),
            }
        }
        _ => None,
    }
}

/// Letter spacing from a resolved literal.
pub fn normalize_letter_spacing(literal: &Literal) -> Option<Value> {
    match literal {
        Literal::Number(n) => Some(number_value(*n)),
        Literal::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Some(number_value(n)),
                _ => letter_spacing_for_name(trimmed).map(number_value),
            }
        }
        _ => None,
    }
}

/// Font family list from a comma-separated string.
pub fn font_family_list(text: &str) -> Option<Value> {
    let families: Vec<Value> = text
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|part| !part.is_empty())
        .map(|part| Value::String(part.to_string()))
        .collect();
    (!families.is_empty()).then_some(Value::Array(families))
}

/// Foundation typography token for a literal, or `None` when the value
/// cannot be normalized.
pub fn foundation_token(kind: TypographyKind, literal: &Literal) -> Option<Token> {
    let value = match kind {
        TypographyKind::FontFamily => match literal {
            Literal::String(s) => font_family_list(s),
            _ => None,
        },
        TypographyKind::FontSize | TypographyKind::LineHeight => match literal {
            Literal::Number(n) => Some(number_value(*n)),
            _ => None,
        },
        TypographyKind::FontWeight => normalize_weight(literal),
        TypographyKind::LetterSpacing => normalize_letter_spacing(literal),
    }?;
    Some(Token::literal(kind.token_type(), value))
}

fn foundation_reference(kind: TypographyKind, key: &str) -> Value {
    Value::String(reference_to(&format!(
        "typography.foundation.{}.{key}",
        kind.group()
    )))
}

fn bound(alias: Option<&AliasRef>, graph: &VariableGraph) -> Option<Value> {
    let alias = alias?;
    match resolve_alias(&alias.id, graph) {
        Ok(reference) => Some(Value::String(reference)),
        Err(reason) => {
            tracing::debug!(target_id = %alias.id, %reason, "bound variable ignored");
            None
        }
    }
}

/// Build the composite token for a text style.
///
/// Bound variables win. Otherwise font size and weight point at the
/// foundation scale derived from the style name and font style, while
/// family, line height and letter spacing fall back to the style's own
/// literals. Returns a warning message when no font weight can be found.
pub fn semantic_token(
    style: &TextStyle,
    name: &TextStyleName,
    graph: &VariableGraph,
) -> Result<Token, String> {
    let bindings = &style.bound_variables;
    let mut composite = Map::new();

    let family = bound(bindings.font_family.as_ref(), graph)
        .or_else(|| font_family_list(&style.font_family))
        .ok_or_else(|| format!("text style `{}` has no font family", style.name))?;
    composite.insert("fontFamily".into(), family);

    let size = bound(bindings.font_size.as_ref(), graph)
        .unwrap_or_else(|| foundation_reference(TypographyKind::FontSize, &name.size));
    composite.insert("fontSize".into(), size);

    let weight = match bound(bindings.font_weight.as_ref(), graph) {
        Some(weight) => weight,
        None => {
            let key = normalize_name(&style.font_style);
            if weight_for_name(&key).is_none() {
                return Err(format!(
                    "text style `{}` uses unmapped font style `{}`",
                    style.name, style.font_style
                ));
            }
            foundation_reference(TypographyKind::FontWeight, &key)
        }
    };
    composite.insert("fontWeight".into(), weight);

    if let Some(line_height) = bound(bindings.line_height.as_ref(), graph)
        .or_else(|| style.line_height.map(number_value))
    {
        composite.insert("lineHeight".into(), line_height);
    }

    if let Some(letter_spacing) = bound(bindings.letter_spacing.as_ref(), graph)
        .or_else(|| style.letter_spacing.map(number_value))
    {
        composite.insert("letterSpacing".into(), letter_spacing);
    }

    Ok(Token::literal(TokenType::Typography, Value::Object(composite))
        .with_description(style.description.clone()))
}
