//! Variable sources.
//!
//! A [`VariableSource`] answers the read-only queries extraction needs. The
//! [`SnapshotSource`] serves them from an exported variable document.

use crate::error::SourceError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tokensync_tokens::{Collection, PrimitiveKind, TextStyle, Variable, VariableGraph};

/// Read-only access to the design tool's variables.
#[async_trait]
pub trait VariableSource: Send + Sync {
    /// All variables of one primitive kind.
    async fn variables(&self, kind: PrimitiveKind) -> Result<Vec<Variable>, SourceError>;

    async fn variable(&self, id: &str) -> Result<Option<Variable>, SourceError>;

    async fn collection(&self, id: &str) -> Result<Option<Collection>, SourceError>;

    async fn text_styles(&self) -> Result<Vec<TextStyle>, SourceError>;
}

const KINDS: [PrimitiveKind; 4] = [
    PrimitiveKind::Color,
    PrimitiveKind::Number,
    PrimitiveKind::String,
    PrimitiveKind::Boolean,
];

/// Query a source into an in-memory graph.
///
/// Alias targets outside the listed variables are fetched by id so that
/// one-hop resolution can see them.
pub async fn load_graph(source: &dyn VariableSource) -> Result<VariableGraph, SourceError> {
    let mut graph = VariableGraph::new();
    let mut collection_ids = BTreeSet::new();

    for kind in KINDS {
        for variable in source.variables(kind).await? {
            collection_ids.insert(variable.variable_collection_id.clone());
            graph.insert_variable(variable);
        }
    }

    let missing: BTreeSet<String> = graph
        .variables()
        .flat_map(|v| v.values_by_mode.values())
        .filter_map(|value| value.as_alias())
        .filter(|id| graph.variable(id).is_none())
        .map(str::to_string)
        .collect();
    for id in missing {
        match source.variable(&id).await? {
            Some(variable) => {
                collection_ids.insert(variable.variable_collection_id.clone());
                graph.insert_variable(variable);
            }
            None => tracing::debug!(%id, "alias target not found in source"),
        }
    }

    for id in collection_ids {
        match source.collection(&id).await? {
            Some(collection) => graph.insert_collection(collection),
            None => tracing::warn!(%id, "variable collection not found; using first mode"),
        }
    }

    for style in source.text_styles().await? {
        graph.push_text_style(style);
    }

    tracing::debug!(
        variables = graph.variables().count(),
        collections = graph.collections().count(),
        text_styles = graph.text_styles().len(),
        "loaded variable graph"
    );
    Ok(graph)
}

/// Variable export in the shape of the design tool's REST "local variables"
/// response, with text styles alongside.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default)]
    meta: SnapshotMeta,
    #[serde(default)]
    text_styles: Vec<TextStyle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotMeta {
    #[serde(default)]
    variable_collections: BTreeMap<String, Collection>,
    #[serde(default)]
    variables: BTreeMap<String, Variable>,
}

/// Serves queries from an in-memory graph.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    graph: VariableGraph,
}

impl SnapshotSource {
    pub fn from_graph(graph: VariableGraph) -> Self {
        Self { graph }
    }

    /// Parse an exported variable document.
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        let mut graph = VariableGraph::new();
        for collection in snapshot.meta.variable_collections.into_values() {
            graph.insert_collection(collection);
        }
        for variable in snapshot.meta.variables.into_values() {
            graph.insert_variable(variable);
        }
        for style in snapshot.text_styles {
            graph.push_text_style(style);
        }
        Ok(Self { graph })
    }

    /// Read and parse an exported variable document.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let source = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded variable snapshot");
        Ok(source)
    }

    pub fn graph(&self) -> &VariableGraph {
        &self.graph
    }
}

#[async_trait]
impl VariableSource for SnapshotSource {
    async fn variables(&self, kind: PrimitiveKind) -> Result<Vec<Variable>, SourceError> {
        Ok(self
            .graph
            .variables()
            .filter(|v| v.kind == kind)
            .cloned()
            .collect())
    }

    async fn variable(&self, id: &str) -> Result<Option<Variable>, SourceError> {
        Ok(self.graph.variable(id).cloned())
    }

    async fn collection(&self, id: &str) -> Result<Option<Collection>, SourceError> {
        Ok(self.graph.collection(id).cloned())
    }

    async fn text_styles(&self) -> Result<Vec<TextStyle>, SourceError> {
        Ok(self.graph.text_styles().to_vec())
    }
}
