use crate::domain::{RepositoryError, VideoRecord};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a new record, keyed by its video id
    async fn insert(&self, record: &VideoRecord) -> Result<(), RepositoryError>;

    /// All records, most recently created first
    async fn list_all(&self) -> Result<Vec<VideoRecord>, RepositoryError>;
}
