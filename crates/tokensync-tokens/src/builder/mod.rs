//! Folds classified, resolved values into per-file token trees.

pub mod order;
pub mod typography;

use crate::file::{ThemeName, TokenFileId};
use crate::resolver::{Literal, Resolution, SkipReason};
use crate::serialize::{serialize, KeyOrder};
use crate::taxonomy::{ParsedName, TokenCategory};
use crate::token::{is_token_node, Token, TokenType};
use crate::variable::Variable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Value of the synthesized `full` radius.
pub const FULL_RADIUS_VALUE: &str = "50%";
/// Description of the synthesized `full` radius.
pub const FULL_RADIUS_DESCRIPTION: &str = "Fully rounded corners (pill or circle)";

/// Per-category counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub processed: usize,
    pub skipped: usize,
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Keyed by [`TokenCategory::label`].
    pub categories: BTreeMap<String, CategoryStats>,
    /// Names that matched no category.
    pub unclassified: usize,
}

impl ExtractionStats {
    pub fn category(&self, category: TokenCategory) -> CategoryStats {
        self.categories
            .get(category.label())
            .copied()
            .unwrap_or_default()
    }

    pub fn total_processed(&self) -> usize {
        self.categories.values().map(|s| s.processed).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.values().map(|s| s.skipped).sum()
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens, {} skipped, {} unclassified",
            self.total_processed(),
            self.total_skipped(),
            self.unclassified
        )
    }
}

/// A built token tree and its key order.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenFile {
    pub tree: Value,
    pub key_order: KeyOrder,
}

impl TokenFile {
    /// Render with the ordered serializer.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        serialize(&self.tree, &self.key_order)
    }
}

/// Everything one extraction produced.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub files: BTreeMap<TokenFileId, TokenFile>,
    pub stats: ExtractionStats,
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    pub fn file(&self, id: TokenFileId) -> Option<&TokenFile> {
        self.files.get(&id)
    }

    /// Trees by file, as the validator and detector consume them.
    pub fn trees(&self) -> BTreeMap<TokenFileId, Value> {
        self.files
            .iter()
            .map(|(id, file)| (*id, file.tree.clone()))
            .collect()
    }

    /// Re-order theme keys so keys already published keep their place.
    ///
    /// `remote` holds the key order recorded while parsing each fetched
    /// file; files missing from it get plain alphabetical order.
    pub fn apply_remote_order(&mut self, remote: &BTreeMap<TokenFileId, KeyOrder>) {
        for (id, file) in self.files.iter_mut() {
            if !matches!(id, TokenFileId::Theme(_)) {
                continue;
            }
            let root: Vec<String> = id.root().iter().map(|s| (*s).to_string()).collect();
            let Some(Value::Object(node)) = pointer(&file.tree, &root) else {
                continue;
            };
            let remote_keys = remote.get(id).and_then(|order| order.get(&root));
            let keys = order::merge_remote_order(node, remote_keys);
            file.key_order.set(root, keys);
        }
    }
}

fn pointer<'a>(tree: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, key| node.get(key))
}

/// Accumulates tokens during an extraction pass.
#[derive(Debug, Default)]
pub struct TokenBuilder {
    entries: BTreeMap<TokenFileId, BTreeMap<Vec<String>, (TokenCategory, Token)>>,
    stats: ExtractionStats,
    warnings: Vec<String>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&mut self, category: TokenCategory) -> &mut CategoryStats {
        self.stats
            .categories
            .entry(category.label().to_string())
            .or_default()
    }

    /// Insert a token. The first token at a path wins; later ones are
    /// counted as skipped.
    pub fn insert(
        &mut self,
        category: TokenCategory,
        file: TokenFileId,
        path: Vec<String>,
        token: Token,
    ) -> bool {
        match self.entries.entry(file).or_default().entry(path) {
            Entry::Vacant(slot) => {
                slot.insert((category, token));
                self.counters(category).processed += 1;
                true
            }
            Entry::Occupied(slot) => {
                debug!(file = %file, path = ?slot.key(), "duplicate token ignored");
                self.counters(category).skipped += 1;
                false
            }
        }
    }

    /// Count a skipped entry.
    pub fn skip(&mut self, category: TokenCategory, name: &str, reason: impl fmt::Display) {
        debug!(category = %category, name, %reason, "skipped");
        self.counters(category).skipped += 1;
    }

    /// Count a skipped entry and keep the message as an extraction warning.
    pub fn warn(&mut self, category: TokenCategory, message: String) {
        warn!(category = %category, "{message}");
        self.counters(category).skipped += 1;
        self.warnings.push(message);
    }

    pub fn note_unclassified(&mut self, name: &str) {
        debug!(name, "unclassified");
        self.stats.unclassified += 1;
    }

    /// Add a variable from a foundation or semantic collection.
    pub fn add_variable(
        &mut self,
        category: TokenCategory,
        parsed: &ParsedName,
        variable: &Variable,
        resolution: Resolution,
    ) {
        let token = match resolution {
            Resolution::Unresolvable(reason) => {
                return self.skip(category, &variable.name, reason);
            }
            Resolution::Reference(reference) => {
                if !category.permits_reference() {
                    return self.skip(
                        category,
                        &variable.name,
                        SkipReason::ReferenceNotPermitted { reference },
                    );
                }
                Token::reference(token_type_of(category), reference)
            }
            Resolution::Literal(literal) => match literal_token(category, &literal) {
                Some(token) => token,
                None if matches!(category, TokenCategory::FoundationTypography(_)) => {
                    return self.warn(
                        category,
                        format!("`{}` has unmapped value {literal:?}; dropped", variable.name),
                    );
                }
                None => {
                    return self.skip(category, &variable.name, "literal does not fit category");
                }
            },
        };

        let token = token.with_description(variable.description.clone());
        self.insert(category, parsed.file(), parsed.relative_path(), token);
    }

    /// Add one theme mode's value for a theme variable.
    pub fn add_theme_value(
        &mut self,
        theme: ThemeName,
        key: &str,
        variable: &Variable,
        resolution: Resolution,
    ) {
        let category = TokenCategory::ThemeColor;
        let token = match resolution {
            Resolution::Literal(Literal::Color(hex)) => {
                Token::literal(TokenType::Color, Value::String(hex))
            }
            Resolution::Reference(reference) => Token::reference(TokenType::Color, reference),
            Resolution::Literal(_) => {
                return self.skip(category, &variable.name, "theme value is not a color");
            }
            Resolution::Unresolvable(reason) => {
                debug!(theme = %theme, "theme value unresolved");
                return self.skip(category, &variable.name, reason);
            }
        };

        let token = token.with_description(variable.description.clone());
        self.insert(category, TokenFileId::Theme(theme), vec![key.to_string()], token);
    }

    pub fn finish(mut self) -> ExtractionResult {
        if let Some(radius) = self.entries.get_mut(&TokenFileId::FoundationRadius) {
            radius.insert(
                vec!["full".to_string()],
                (
                    TokenCategory::FoundationRadius,
                    Token::literal(TokenType::Dimension, Value::String(FULL_RADIUS_VALUE.into()))
                        .with_description(FULL_RADIUS_DESCRIPTION),
                ),
            );
        }

        let mut files = BTreeMap::new();
        for (id, entries) in self.entries {
            if entries.is_empty() {
                continue;
            }
            let mut tree = id.skeleton();
            let root: Vec<String> = id.root().iter().map(|s| (*s).to_string()).collect();
            for (path, (category, token)) in entries {
                let full: Vec<String> = root.iter().cloned().chain(path).collect();
                if !insert_at(&mut tree, &full, token.to_json()) {
                    let counters = self
                        .stats
                        .categories
                        .entry(category.label().to_string())
                        .or_default();
                    counters.processed = counters.processed.saturating_sub(1);
                    counters.skipped += 1;
                    let message =
                        format!("`{}` collides with a token in {id}; dropped", full.join("."));
                    warn!(category = %category, "{message}");
                    self.warnings.push(message);
                }
            }
            let key_order = order::build_order(id, &tree);
            files.insert(id, TokenFile { tree, key_order });
        }

        ExtractionResult {
            files,
            stats: self.stats,
            warnings: self.warnings,
        }
    }
}

fn token_type_of(category: TokenCategory) -> TokenType {
    match category {
        TokenCategory::FoundationColor
        | TokenCategory::SemanticAttachmentColor
        | TokenCategory::ThemeColor => TokenType::Color,
        TokenCategory::FoundationRadius | TokenCategory::FoundationSpacing => TokenType::Dimension,
        TokenCategory::FoundationTypography(kind) => kind.token_type(),
        TokenCategory::SemanticTypography => TokenType::Typography,
    }
}

fn literal_token(category: TokenCategory, literal: &Literal) -> Option<Token> {
    match (category, literal) {
        (
            TokenCategory::FoundationColor | TokenCategory::SemanticAttachmentColor,
            Literal::Color(hex),
        ) => Some(Token::literal(TokenType::Color, Value::String(hex.clone()))),
        (TokenCategory::FoundationRadius | TokenCategory::FoundationSpacing, Literal::Number(_)) => {
            Some(Token::literal(TokenType::Dimension, literal.to_json()))
        }
        (TokenCategory::FoundationTypography(kind), _) => {
            typography::foundation_token(kind, literal)
        }
        _ => None,
    }
}

/// Set `value` at `path`, creating groups on the way. Fails if a token or
/// other non-group node is in the way.
fn insert_at(tree: &mut Value, path: &[String], value: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };
    let mut node = tree;
    for key in parents {
        let Some(map) = node.as_object_mut() else {
            return false;
        };
        node = map
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    let Some(map) = node.as_object_mut() else {
        return false;
    };
    if is_token_node(map) {
        return false;
    }
    map.insert(last.clone(), value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{parse_radius, TypographyKind};
    use crate::variable::PrimitiveKind;
    use serde_json::json;

    fn variable(name: &str, kind: PrimitiveKind) -> Variable {
        Variable {
            id: format!("id:{name}"),
            name: name.into(),
            kind,
            variable_collection_id: "c".into(),
            values_by_mode: BTreeMap::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_radius_file_always_has_full() {
        let mut builder = TokenBuilder::new();
        let var = variable("radius-m", PrimitiveKind::Number);
        builder.add_variable(
            TokenCategory::FoundationRadius,
            &parse_radius("radius-m").unwrap(),
            &var,
            Resolution::Literal(Literal::Number(8.0)),
        );
        let result = builder.finish();
        let radius = &result.file(TokenFileId::FoundationRadius).unwrap().tree;

        assert_eq!(radius["radius"]["foundation"]["m"]["$value"], json!(8));
        assert_eq!(radius["radius"]["foundation"]["full"]["$value"], json!("50%"));
        assert_eq!(
            radius["radius"]["foundation"]["full"]["$description"],
            json!(FULL_RADIUS_DESCRIPTION)
        );
    }

    #[test]
    fn test_first_token_wins() {
        let mut builder = TokenBuilder::new();
        let path = vec!["link".to_string()];
        let file = TokenFileId::Theme(ThemeName::Light);
        assert!(builder.insert(
            TokenCategory::ThemeColor,
            file,
            path.clone(),
            Token::literal(TokenType::Color, json!("#000000"))
        ));
        assert!(!builder.insert(
            TokenCategory::ThemeColor,
            file,
            path,
            Token::literal(TokenType::Color, json!("#FFFFFF"))
        ));
        let result = builder.finish();
        let stats = result.stats.category(TokenCategory::ThemeColor);
        assert_eq!((stats.processed, stats.skipped), (1, 1));
        assert_eq!(
            result.file(file).unwrap().tree["color"]["theme"]["link"]["$value"],
            json!("#000000")
        );
    }

    #[test]
    fn test_foundation_reference_is_skipped() {
        let mut builder = TokenBuilder::new();
        let var = variable("radius-s", PrimitiveKind::Number);
        builder.add_variable(
            TokenCategory::FoundationRadius,
            &parse_radius("radius-s").unwrap(),
            &var,
            Resolution::Reference("{spacing.foundation.xs}".into()),
        );
        let result = builder.finish();
        assert!(result.files.is_empty());
        assert_eq!(result.stats.category(TokenCategory::FoundationRadius).skipped, 1);
    }

    #[test]
    fn test_apply_remote_order_keeps_published_keys_in_place() {
        let mut builder = TokenBuilder::new();
        let file = TokenFileId::Theme(ThemeName::Dark);
        for key in ["surface", "border", "accent"] {
            builder.insert(
                TokenCategory::ThemeColor,
                file,
                vec![key.to_string()],
                Token::literal(TokenType::Color, json!("#000000")),
            );
        }
        let mut result = builder.finish();

        let root = vec!["color".to_string(), "theme".to_string()];
        assert_eq!(
            result.file(file).unwrap().key_order.get(&root),
            Some(&["accent".to_string(), "border".to_string(), "surface".to_string()][..])
        );

        let mut remote = KeyOrder::new();
        remote.set(root.clone(), vec!["surface".into(), "border".into()]);
        result.apply_remote_order(&BTreeMap::from([(file, remote)]));
        assert_eq!(
            result.file(file).unwrap().key_order.get(&root),
            Some(&["surface".to_string(), "border".to_string(), "accent".to_string()][..])
        );
    }

    #[test]
    fn test_token_under_another_token_is_counted_as_skipped() {
        let mut builder = TokenBuilder::new();
        let file = TokenFileId::FoundationTypography;
        let category = TokenCategory::FoundationTypography(TypographyKind::FontSize);
        builder.insert(
            category,
            file,
            vec!["fontSize".into(), "700".into()],
            Token::literal(TokenType::Dimension, json!(32)),
        );
        builder.insert(
            category,
            file,
            vec!["fontSize".into(), "700".into(), "tight".into()],
            Token::literal(TokenType::Dimension, json!(30)),
        );
        let result = builder.finish();

        let stats = result.stats.category(category);
        assert_eq!((stats.processed, stats.skipped), (1, 1));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("typography.foundation.fontSize.700.tight"));
    }

    #[test]
    fn test_insert_at_refuses_to_overwrite_token_with_group() {
        let mut tree = json!({ "a": { "b": 1 } });
        let path = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(!insert_at(&mut tree, &path, json!(2)));

        let mut tree = json!({ "a": { "b": { "$type": "dimension", "$value": 4 } } });
        assert!(!insert_at(&mut tree, &path, json!(2)));
    }
}
