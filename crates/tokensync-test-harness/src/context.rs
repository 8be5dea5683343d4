//! Isolated working directories for tests.

use crate::fixtures::snapshot_json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokensync_tokens::VariableGraph;

/// A test's own temporary directory, removed on drop.
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get the temporary directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file in the temp directory
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Export `graph` as a variable snapshot file
    pub fn write_snapshot(&self, name: &str, graph: &VariableGraph) -> PathBuf {
        let text = serde_json::to_string_pretty(&snapshot_json(graph))
            .expect("Failed to serialize snapshot");
        self.create_file(name, &text)
    }

    /// Write `.tokensync/config.yaml` under the temp directory
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        self.create_file(".tokensync/config.yaml", yaml)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
