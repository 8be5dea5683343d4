//! Extraction entry point.
//!
//! Runs three passes over an in-memory [`VariableGraph`]:
//!
//! 1. named variables in non-theme collections, classified by name;
//! 2. color variables in theme collections, once per theme mode;
//! 3. text styles, which become semantic typography composites.

use crate::builder::typography::semantic_token;
use crate::builder::{ExtractionResult, TokenBuilder};
use crate::error::{TokenError, TokenResult};
use crate::file::TokenFileId;
use crate::resolver::{resolve, ValueContext};
use crate::taxonomy::{
    classify, has_opacity_suffix, is_theme_collection, parse_text_style_name, theme_modes,
    TokenCategory,
};
use crate::variable::{Collection, PrimitiveKind, VariableGraph};
use tracing::{debug, info, instrument};

/// Build every token file the graph describes.
///
/// Data problems are counted, never raised. The only error is a name that
/// classifies but does not parse, which means the taxonomy itself is broken.
#[instrument(skip_all, fields(variables = graph.variables().count()))]
pub fn extract(graph: &VariableGraph) -> TokenResult<ExtractionResult> {
    let mut builder = TokenBuilder::new();

    extract_named(graph, &mut builder)?;
    for collection in graph.collections().filter(|c| is_theme_collection(c)) {
        extract_theme(graph, collection, &mut builder);
    }
    extract_text_styles(graph, &mut builder);

    let result = builder.finish();
    info!(stats = %result.stats, files = result.files.len(), "extraction finished");
    Ok(result)
}

fn extract_named(graph: &VariableGraph, builder: &mut TokenBuilder) -> TokenResult<()> {
    for variable in graph.variables() {
        let in_theme = graph
            .collection(&variable.variable_collection_id)
            .is_some_and(is_theme_collection);
        if in_theme {
            continue;
        }

        let Some(category) = classify(&variable.name, variable.kind) else {
            builder.note_unclassified(&variable.name);
            continue;
        };
        let parsed = category
            .parse(&variable.name)
            .ok_or_else(|| TokenError::ClassificationMismatch {
                name: variable.name.clone(),
                category,
            })?;

        let Some(mode) = graph.default_mode_of(variable) else {
            builder.skip(category, &variable.name, "no mode to read");
            continue;
        };
        let resolution = resolve(variable, mode, graph, ValueContext::Source);
        builder.add_variable(category, &parsed, variable, resolution);
    }
    Ok(())
}

fn extract_theme(graph: &VariableGraph, collection: &Collection, builder: &mut TokenBuilder) {
    let modes = theme_modes(collection);
    debug!(collection = %collection.name, themes = modes.len(), "theme collection");

    for variable in graph.variables_in(&collection.id) {
        if variable.kind != PrimitiveKind::Color {
            builder.note_unclassified(&variable.name);
            continue;
        }
        if has_opacity_suffix(&variable.name) {
            builder.skip(TokenCategory::ThemeColor, &variable.name, "opacity variant");
            continue;
        }

        let key = theme_key(&variable.name);
        for (mode, theme) in &modes {
            let resolution = resolve(variable, mode, graph, ValueContext::Theme);
            builder.add_theme_value(*theme, &key, variable, resolution);
        }
    }
}

/// Flat key under `color.theme`: `sidebar/bg` -> `sidebar-bg`.
pub fn theme_key(name: &str) -> String {
    name.split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn extract_text_styles(graph: &VariableGraph, builder: &mut TokenBuilder) {
    let category = TokenCategory::SemanticTypography;
    for style in graph.text_styles() {
        let Some(name) = parse_text_style_name(&style.name) else {
            builder.note_unclassified(&style.name);
            continue;
        };
        match semantic_token(style, &name, graph) {
            Ok(token) => {
                builder.insert(
                    category,
                    TokenFileId::SemanticTypography,
                    vec![name.group.clone(), name.key()],
                    token,
                );
            }
            Err(message) => builder.warn(category, message),
        }
    }
}
