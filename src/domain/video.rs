use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValidationError;

/// Longest accepted title, counted in Unicode scalar values.
pub const MAX_TITLE_CHARS: usize = 100;

/// Infix shared by every file the packaging stage emits.
pub const DASH_INFIX: &str = "_dash";

/// Opaque token naming one video across workspace files, storage keys and
/// the metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the original upload inside the workspace.
    pub fn original_file_name(&self) -> String {
        format!("{}.mp4", self.0)
    }

    /// File name of the manifest written by the packaging stage.
    pub fn manifest_file_name(&self) -> String {
        format!("{}{}.mpd", self.0, DASH_INFIX)
    }

    /// Whether a workspace file belongs to the packaged asset set of this video.
    pub fn owns_packaged_file(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.contains(DASH_INFIX))
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VideoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A title that passed the length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        match raw.chars().count() {
            0 => Err(ValidationError::TitleMissing),
            n if n > MAX_TITLE_CHARS => Err(ValidationError::TitleTooLong(n)),
            _ => Ok(Self(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Durable trace of a completed ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: VideoId,
    pub title: String,
    pub original_video_url: String,
    pub video_mpd_url: String,
    pub created_at: DateTime<Utc>,
}
