//! Writing artifacts to disk.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::persist::write_atomic;

/// Atomically write an artifact, creating parent directories.
///
/// The file always ends with a newline.
pub fn write_artifact(path: &Path, text: &str) -> Result<(), PipelineError> {
    let mut content = text.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    write_atomic(path, content.as_bytes()).map_err(|source| PipelineError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// [`write_artifact`] on a blocking worker thread.
pub async fn write_artifact_async(path: PathBuf, text: String) -> Result<(), PipelineError> {
    tokio::task::spawn_blocking(move || write_artifact(&path, &text))
        .await
        .map_err(|e| PipelineError::TaskFailed(e.to_string()))?
}
