use crate::domain::{RepositoryError, VideoRecord};
use crate::ports::repository::VideoRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local metadata store. Records are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    records: Arc<RwLock<Vec<VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn insert(&self, record: &VideoRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.video_id == record.video_id) {
            return Err(RepositoryError::Duplicate(record.video_id.to_string()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<VideoRecord>, RepositoryError> {
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
