//! Error taxonomy of the ingestion pipeline.

use std::io;
use thiserror::Error;

use super::stage::IngestStage;

/// Problems with the upload itself. Always the client's fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title required")]
    TitleMissing,
    #[error("title too long ({0} characters)")]
    TitleTooLong(usize),
    #[error("file required")]
    FileMissing,
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("malformed form: {0}")]
    MalformedForm(String),
}

/// The two external transcoding stages, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeStage {
    Sample,
    Package,
}

impl TranscodeStage {
    pub fn name(&self) -> &'static str {
        match self {
            TranscodeStage::Sample => "sample",
            TranscodeStage::Package => "package",
        }
    }
}

impl std::fmt::Display for TranscodeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{stage} stage could not be started: {source}")]
    Spawn {
        stage: TranscodeStage,
        #[source]
        source: io::Error,
    },
    #[error("{stage} stage exited with {code:?}: {stderr}")]
    Exited {
        stage: TranscodeStage,
        code: Option<i32>,
        stderr: String,
    },
}

impl TranscodeError {
    pub fn stage(&self) -> TranscodeStage {
        match self {
            TranscodeError::Spawn { stage, .. } | TranscodeError::Exited { stage, .. } => *stage,
        }
    }
}

/// Failure of a single object-storage call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Fatal publish failure. Per-file upload failures never produce this.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot enumerate workspace: {0}")]
    Enumerate(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("video {0} already exists")]
    Duplicate(String),
    #[error("metadata store unavailable: {0}")]
    Backend(String),
}

/// Terminal outcome of a failed ingestion, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid upload: {0}")]
    Validation(#[from] ValidationError),
    #[error("cannot open workspace: {0}")]
    Workspace(#[source] io::Error),
    #[error("cannot save upload: {0}")]
    Save(#[source] io::Error),
    #[error("transcoding failed: {0}")]
    Transcode(#[from] TranscodeError),
    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),
    #[error("commit failed: {0}")]
    Commit(#[from] RepositoryError),
}

impl IngestError {
    /// State the pipeline was in when it failed.
    pub fn stage(&self) -> IngestStage {
        match self {
            IngestError::Validation(_) => IngestStage::Validating,
            IngestError::Workspace(_) => IngestStage::WorkspaceOpen,
            IngestError::Save(_) => IngestStage::WorkspaceOpen,
            IngestError::Transcode(_) => IngestStage::InputSaved,
            IngestError::Publish(_) => IngestStage::Transcoded,
            IngestError::Commit(_) => IngestStage::Published,
        }
    }

    /// Short name of the failed step, used in logs.
    pub fn failed_step(&self) -> &'static str {
        match self {
            IngestError::Validation(_) => "validation",
            IngestError::Workspace(_) => "workspace",
            IngestError::Save(_) => "save",
            IngestError::Transcode(_) => "transcode",
            IngestError::Publish(_) => "publish",
            IngestError::Commit(_) => "commit",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestError::Validation(_))
    }
}
