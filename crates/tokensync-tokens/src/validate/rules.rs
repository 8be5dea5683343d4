use super::{FileReport, Severity};
use crate::file::TokenFileId;
use crate::taxonomy::{
    has_opacity_suffix, TypographyKind, ATTACHMENT_COLORS, COLOR_FAMILIES, RADIUS_SIZES,
    SPACING_SIZES, TEXT_STYLE_GROUPS,
};
use crate::token::{is_hex_color, is_reference, is_token_node, TokenType, TYPE_KEY, VALUE_KEY};
use serde_json::{Map, Value};

/// Members every composite typography value must carry.
const REQUIRED_COMPOSITE_KEYS: [&str; 3] = ["fontFamily", "fontSize", "fontWeight"];

pub(super) fn check(file: TokenFileId, tree: &Value, report: &mut FileReport) {
    let root: Vec<String> = file.root().iter().map(|s| (*s).to_string()).collect();
    let node = root.iter().try_fold(tree, |node, key| node.get(key));
    let Some(Value::Object(node)) = node else {
        report.push(
            Severity::Error,
            &[],
            format!("missing root `{}`", root.join(".")),
        );
        return;
    };

    walk(file, &root, node, report);
    completeness(file, &root, node, report);
}

fn walk(file: TokenFileId, path: &[String], group: &Map<String, Value>, report: &mut FileReport) {
    let root_len = file.root().len();
    for (key, child) in group {
        let mut child_path = path.to_vec();
        child_path.push(key.clone());

        if file.is_foundation() && has_opacity_suffix(key) {
            report.push(
                Severity::Error,
                &child_path,
                format!("opacity variant `{key}` must not appear in a foundation file"),
            );
        }

        match child {
            Value::Object(node) if is_token_node(node) => {
                check_token(file, &child_path[root_len..], &child_path, node, report);
            }
            Value::Object(node) => walk(file, &child_path, node, report),
            _ => report.push(Severity::Error, &child_path, "expected a token or a group"),
        }
    }
}

fn expected_type(file: TokenFileId, relative: &[String]) -> Option<TokenType> {
    match file {
        TokenFileId::FoundationColor | TokenFileId::SemanticAttachment | TokenFileId::Theme(_) => {
            Some(TokenType::Color)
        }
        TokenFileId::FoundationRadius | TokenFileId::FoundationSpacing => Some(TokenType::Dimension),
        TokenFileId::FoundationTypography => relative
            .first()
            .and_then(|group| TypographyKind::from_group(group))
            .map(|kind| kind.token_type()),
        TokenFileId::SemanticTypography => Some(TokenType::Typography),
    }
}

fn check_token(
    file: TokenFileId,
    relative: &[String],
    path: &[String],
    node: &Map<String, Value>,
    report: &mut FileReport,
) {
    let expected = expected_type(file, relative);

    match node.get(TYPE_KEY) {
        None => report.push(Severity::Error, path, "missing `$type`"),
        Some(Value::String(found)) => {
            if let Some(expected) = expected {
                if found != expected.as_str() {
                    report.push(
                        Severity::Error,
                        path,
                        format!("expected `$type` {}, found {found}", expected.as_str()),
                    );
                }
            }
        }
        Some(_) => report.push(Severity::Error, path, "`$type` must be a string"),
    }

    match node.get(VALUE_KEY) {
        Some(value) if !is_empty(value) => {
            if let Some(expected) = expected {
                check_value(file, expected, path, value, report);
            }
        }
        _ => report.push(Severity::Error, path, "missing or empty `$value`"),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn check_value(
    file: TokenFileId,
    expected: TokenType,
    path: &[String],
    value: &Value,
    report: &mut FileReport,
) {
    match expected {
        TokenType::Color => check_color(file, path, value, report),
        TokenType::Dimension => {
            let ok = value.is_number() || value.as_str().is_some_and(|s| s.ends_with('%'));
            if !ok {
                report.push(Severity::Error, path, format!("{value} is not a number or percentage"));
            }
        }
        TokenType::FontFamily => {
            let ok = value.as_array().is_some_and(|items| {
                !items.is_empty()
                    && items
                        .iter()
                        .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
            });
            if !ok {
                report.push(Severity::Error, path, "font family must be a non-empty list of names");
            }
        }
        TokenType::FontWeight => {
            let ok = value.as_f64().is_some_and(|w| (100.0..=900.0).contains(&w));
            if !ok {
                report.push(Severity::Error, path, format!("font weight {value} is outside 100-900"));
            }
        }
        TokenType::Typography => match value.as_object() {
            Some(composite) => {
                for key in REQUIRED_COMPOSITE_KEYS {
                    if !composite.contains_key(key) {
                        report.push(Severity::Error, path, format!("typography is missing `{key}`"));
                    }
                }
            }
            None => report.push(Severity::Error, path, "typography value must be an object"),
        },
        TokenType::String => {
            if !value.is_string() {
                report.push(Severity::Error, path, "value must be a string");
            }
        }
    }
}

fn check_color(file: TokenFileId, path: &[String], value: &Value, report: &mut FileReport) {
    let Some(text) = value.as_str() else {
        report.push(Severity::Error, path, "color must be a string");
        return;
    };

    if file == TokenFileId::FoundationColor {
        if !is_hex_color(text) {
            report.push(
                Severity::Error,
                path,
                format!("`{text}` is not an uppercase #RRGGBB color"),
            );
        }
    } else if is_hex_color(text) {
        report.push(
            Severity::Warning,
            path,
            format!("literal color `{text}`; a reference to a foundation token is preferred"),
        );
    } else if !is_reference(text) {
        report.push(
            Severity::Error,
            path,
            format!("`{text}` is neither a reference nor an uppercase #RRGGBB color"),
        );
    }
}

/// Shades each foundation family is expected to define.
fn expected_shades(family: &str) -> Vec<u32> {
    let mut shades: Vec<u32> = (1..=9).map(|step| step * 100).collect();
    if family == "neutral" {
        shades.insert(0, 0);
        shades.push(1000);
    }
    shades
}

fn completeness(file: TokenFileId, root: &[String], node: &Map<String, Value>, report: &mut FileReport) {
    if matches!(file, TokenFileId::Theme(_)) {
        if node.is_empty() {
            report.push(Severity::Warning, root, "theme defines no tokens");
        }
        return;
    }

    let mut missing = |path: &[String], member: &str| {
        report.push(Severity::Warning, path, format!("missing expected member `{member}`"));
    };

    match file {
        TokenFileId::FoundationColor => {
            expect_members(node, &COLOR_FAMILIES, |m| missing(root, m));
            for (family, shades) in node {
                let Value::Object(shades) = shades else {
                    continue;
                };
                let mut path = root.to_vec();
                path.push(family.clone());
                for shade in expected_shades(family) {
                    if !shades.contains_key(&shade.to_string()) {
                        missing(&path, &shade.to_string());
                    }
                }
            }
        }
        TokenFileId::FoundationRadius => expect_members(node, &RADIUS_SIZES, |m| missing(root, m)),
        TokenFileId::FoundationSpacing => expect_members(node, &SPACING_SIZES, |m| missing(root, m)),
        TokenFileId::SemanticAttachment => {
            expect_members(node, &ATTACHMENT_COLORS, |m| missing(root, m))
        }
        TokenFileId::FoundationTypography => {
            let groups: Vec<&str> = TypographyKind::ALL.iter().map(|k| k.group()).collect();
            expect_members(node, &groups, |m| missing(root, m))
        }
        TokenFileId::SemanticTypography => {
            expect_members(node, &TEXT_STYLE_GROUPS, |m| missing(root, m))
        }
        TokenFileId::Theme(_) => {}
    }
}

fn expect_members(node: &Map<String, Value>, members: &[&str], mut missing: impl FnMut(&str)) {
    for member in members {
        if !node.contains_key(*member) {
            missing(member);
        }
    }
}
