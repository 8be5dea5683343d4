//! Writing built token files to a local directory.

use crate::error::{SyncError, SyncResult};
use std::path::{Path, PathBuf};
use tokensync_tokens::{ExtractionResult, TokenError};

/// Write every built file under `dir`, at its repository path.
///
/// Returns the written paths in file order.
pub async fn write_files(dir: &Path, extraction: &ExtractionResult) -> SyncResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(extraction.files.len());

    for (id, file) in &extraction.files {
        let path = dir.join(id.path());
        let text = file.render().map_err(TokenError::from)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SyncError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| SyncError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "wrote token file");
        written.push(path);
    }

    Ok(written)
}
