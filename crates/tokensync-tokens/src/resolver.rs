//! One-hop value resolution.
//!
//! A stored value is either a primitive, which becomes a literal, or an alias
//! to another variable, which becomes a reference to that variable's token
//! path. Aliases are followed exactly once: a target that is itself an alias
//! is reported as unresolvable instead of being chased further.

use crate::taxonomy::{classify, has_opacity_suffix};
use crate::token::{number_value, reference_to};
use crate::variable::{ModeId, PrimitiveKind, Rgba, Variable, VariableGraph, VariableValue};
use serde_json::Value;
use std::fmt;

/// Where a value is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueContext {
    /// Foundation and semantic collections, read in their default mode.
    Source,
    /// A theme mode. Translucent colors cannot be expressed here.
    Theme,
}

/// A resolved primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `#RRGGBB`, uppercase.
    Color(String),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Color(hex) => Value::String(hex.clone()),
            Self::Number(n) => number_value(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
        }
    }
}

/// Why a value could not be turned into a token value.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// No value stored for the requested mode.
    MissingValue { mode: ModeId },
    /// The stored value does not match the variable's declared kind.
    KindMismatch { expected: PrimitiveKind },
    /// Alias target does not exist.
    MissingTarget { id: String },
    /// Alias target is a build-time opacity variant.
    OpacityTarget { name: String },
    /// Alias target is itself an alias in its default mode.
    AliasChain { name: String },
    /// Alias target's name maps onto no token path.
    UnclassifiedTarget { name: String },
    /// Theme color with alpha below 1.
    Translucent { alpha: f64 },
    /// Foundation tokens hold literals only.
    ReferenceNotPermitted { reference: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { mode } => write!(f, "no value for mode `{mode}`"),
            Self::KindMismatch { expected } => write!(f, "stored value is not a {expected:?}"),
            Self::MissingTarget { id } => write!(f, "alias target `{id}` not found"),
            Self::OpacityTarget { name } => write!(f, "alias target `{name}` is an opacity variant"),
            Self::AliasChain { name } => {
                write!(f, "alias target `{name}` is itself an alias")
            }
            Self::UnclassifiedTarget { name } => {
                write!(f, "alias target `{name}` has no token path")
            }
            Self::Translucent { alpha } => write!(f, "alpha {alpha} cannot be expressed as hex"),
            Self::ReferenceNotPermitted { reference } => {
                write!(f, "foundation token cannot reference {reference}")
            }
        }
    }
}

/// Outcome of resolving one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Literal(Literal),
    Reference(String),
    Unresolvable(SkipReason),
}

/// Convert 0-1 channels to `#RRGGBB`. Alpha is not encoded.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Resolve the value `variable` holds in `mode`.
pub fn resolve(
    variable: &Variable,
    mode: &str,
    graph: &VariableGraph,
    context: ValueContext,
) -> Resolution {
    let Some(value) = variable.values_by_mode.get(mode) else {
        return Resolution::Unresolvable(SkipReason::MissingValue {
            mode: mode.to_string(),
        });
    };

    match (value, variable.kind) {
        (VariableValue::Alias(alias), _) => match resolve_alias(&alias.id, graph) {
            Ok(reference) => Resolution::Reference(reference),
            Err(reason) => Resolution::Unresolvable(reason),
        },
        (VariableValue::Color(rgba), PrimitiveKind::Color) => color_literal(rgba, context),
        (VariableValue::Number(n), PrimitiveKind::Number) => Resolution::Literal(Literal::Number(*n)),
        (VariableValue::String(s), PrimitiveKind::String) => {
            Resolution::Literal(Literal::String(s.clone()))
        }
        (VariableValue::Boolean(b), PrimitiveKind::Boolean) => {
            Resolution::Literal(Literal::Boolean(*b))
        }
        (_, expected) => Resolution::Unresolvable(SkipReason::KindMismatch { expected }),
    }
}

fn color_literal(rgba: &Rgba, context: ValueContext) -> Resolution {
    if context == ValueContext::Theme && rgba.a < 1.0 {
        return Resolution::Unresolvable(SkipReason::Translucent { alpha: rgba.a });
    }
    Resolution::Literal(Literal::Color(rgb_to_hex(rgba.r, rgba.g, rgba.b)))
}

/// Follow one alias hop and build the braced reference to its target.
pub fn resolve_alias(target_id: &str, graph: &VariableGraph) -> Result<String, SkipReason> {
    let target = graph
        .variable(target_id)
        .ok_or_else(|| SkipReason::MissingTarget {
            id: target_id.to_string(),
        })?;

    if has_opacity_suffix(&target.name) {
        return Err(SkipReason::OpacityTarget {
            name: target.name.clone(),
        });
    }

    if graph
        .default_value_of(target)
        .and_then(VariableValue::as_alias)
        .is_some()
    {
        return Err(SkipReason::AliasChain {
            name: target.name.clone(),
        });
    }

    reference_for(&target.name, target.kind).ok_or_else(|| SkipReason::UnclassifiedTarget {
        name: target.name.clone(),
    })
}

/// Reference string for a variable name, e.g. `blue/300` ->
/// `{color.foundation.blue.300}`.
pub fn reference_for(name: &str, kind: PrimitiveKind) -> Option<String> {
    let parsed = classify(name, kind)?.parse(name)?;
    Some(reference_to(&parsed.token_path()))
}
