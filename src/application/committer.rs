use crate::domain::{RepositoryError, VideoId, VideoRecord};
use crate::ports::VideoRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Writes the metadata row that makes an ingestion visible.
#[derive(Clone)]
pub struct RecordCommitter {
    repo: Arc<dyn VideoRepository>,
}

impl RecordCommitter {
    pub fn new(repo: Arc<dyn VideoRepository>) -> Self {
        Self { repo }
    }

    pub async fn commit(
        &self,
        video_id: &VideoId,
        title: &str,
        original_url: &str,
        manifest_url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<VideoRecord, RepositoryError> {
        let record = VideoRecord {
            video_id: video_id.clone(),
            title: title.to_string(),
            original_video_url: original_url.to_string(),
            video_mpd_url: manifest_url.to_string(),
            created_at,
        };
        self.repo.insert(&record).await?;
        tracing::info!("video record saved");
        Ok(record)
    }
}
