//! Disk-backed staging of an upload body until its workspace exists.

use crate::domain::{IngestError, ValidationError};
use std::io;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Receives upload chunks into a private file, enforcing the size ceiling as
/// bytes arrive.
#[derive(Debug)]
pub struct UploadSpool {
    writer: BufWriter<File>,
    path: TempPath,
    len: usize,
    limit: usize,
}

impl UploadSpool {
    /// Stage a new upload under `dir`, accepting at most `limit` bytes.
    pub fn new(dir: &Path, limit: usize) -> io::Result<Self> {
        let (file, path) = tempfile::Builder::new()
            .prefix("incoming")
            .tempfile_in(dir)?
            .into_parts();
        Ok(Self {
            writer: BufWriter::new(File::from_std(file)),
            path,
            len: 0,
            limit,
        })
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), IngestError> {
        self.len += chunk.len();
        if self.len > self.limit {
            return Err(ValidationError::TooLarge { limit: self.limit }.into());
        }
        self.writer
            .write_all(chunk)
            .await
            .map_err(IngestError::Save)
    }

    pub async fn finish(mut self) -> Result<UploadedFile, IngestError> {
        self.writer.flush().await.map_err(IngestError::Save)?;
        Ok(UploadedFile {
            path: self.path,
            len: self.len,
        })
    }
}

/// A fully received upload. The staged file is deleted on drop unless it was
/// persisted into a workspace.
#[derive(Debug)]
pub struct UploadedFile {
    path: TempPath,
    len: usize,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staged bytes to `dest`, copying when a rename is not possible.
    pub(crate) async fn persist(self, dest: &Path) -> io::Result<()> {
        match self.path.persist(dest) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(error = %err.error, "rename failed, copying staged upload");
                tokio::fs::copy(&err.path, dest).await?;
                Ok(())
            }
        }
    }
}
