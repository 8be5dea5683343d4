//! Structural validation of built token trees.
//!
//! Errors block publishing; warnings are advisory.

mod rules;

use crate::file::TokenFileId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub file: TokenFileId,
    /// Dotted path of the offending node, empty for file-level findings.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.file, self.message)
        } else {
            write!(f, "{} at {}: {}", self.file, self.path, self.message)
        }
    }
}

/// Findings for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: TokenFileId,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl FileReport {
    fn new(file: TokenFileId) -> Self {
        Self {
            file,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, severity: Severity, path: &[String], message: impl Into<String>) {
        let issue = ValidationIssue {
            file: self.file,
            path: path.join("."),
            message: message.into(),
        };
        match severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate findings across files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate one file's tree.
pub fn validate(file: TokenFileId, tree: &Value) -> FileReport {
    let mut report = FileReport::new(file);
    rules::check(file, tree, &mut report);
    report
}

/// Validate every file present in `trees`.
pub fn validate_all(trees: &BTreeMap<TokenFileId, Value>) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        ..Default::default()
    };
    for (file, tree) in trees {
        let file_report = validate(*file, tree);
        for warning in &file_report.warnings {
            tracing::warn!(%warning, "validation warning");
        }
        report.valid &= file_report.is_valid();
        report.errors.extend(file_report.errors);
        report.warnings.extend(file_report.warnings);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::ThemeName;
    use serde_json::json;

    fn color_tree(key: &str, value: &str) -> Value {
        json!({ "color": { "foundation": { "blue": {
            key: { "$type": "color", "$value": value }
        } } } })
    }

    #[test]
    fn test_accepts_uppercase_hex() {
        let report = validate(TokenFileId::FoundationColor, &color_tree("500", "#1C58D9"));
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_rejects_lowercase_hex() {
        let report = validate(TokenFileId::FoundationColor, &color_tree("500", "#1c58d9"));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "color.foundation.blue.500");
    }

    #[test]
    fn test_rejects_opacity_key_in_foundation_file() {
        let report = validate(TokenFileId::FoundationColor, &color_tree("500-8", "#1C58D9"));
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("opacity"));
    }

    #[test]
    fn test_missing_root_short_circuits() {
        let report = validate(
            TokenFileId::FoundationSpacing,
            &json!({ "spacing": { "base": { "m": { "$value": "oops" } } } }),
        );
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("spacing.foundation"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_all_aggregates() {
        let trees = BTreeMap::from([
            (TokenFileId::FoundationColor, color_tree("500", "#1c58d9")),
            (
                TokenFileId::Theme(ThemeName::Light),
                json!({ "color": { "theme": { "link": { "$type": "color", "$value": "#1C58D9" } } } }),
            ),
        ]);
        let report = validate_all(&trees);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.file == TokenFileId::Theme(ThemeName::Light)));
    }
}
