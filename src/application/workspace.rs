//! Per-ingestion scratch directories.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Hands out isolated workspaces under a common root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, empty, privately owned directory.
    pub fn open(&self) -> io::Result<Workspace> {
        let dir = tempfile::Builder::new()
            .prefix("upload")
            .tempdir_in(&self.root)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700))?;
        }

        tracing::debug!(path = %dir.path().display(), "workspace opened");
        Ok(Workspace { dir: Some(dir) })
    }
}

/// A directory owned by exactly one ingestion.
///
/// Removed by [`Workspace::close`]; dropping an unclosed workspace removes it
/// as well, so error paths cannot leak it.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path().join(file_name)
    }

    /// Remove the directory and everything in it. Failures are logged only.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!(path = %path.display(), "workspace removed"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove workspace")
                }
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}
