use crate::domain::StorageError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under `key` and return its public URL
    async fn put(&self, key: &str, local_path: &Path) -> Result<String, StorageError>;
}
