//! Writing generated artifacts to disk.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Error returned when an artifact cannot be written.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl WriteError {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `bytes` to `path`, replacing any existing file.
///
/// Creates parent directories if they don't exist.
pub async fn write_artifact(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), WriteError> {
    let path = path.as_ref();
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(wrap)?;
    }
    tokio::fs::write(path, bytes).await.map_err(wrap)?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}
