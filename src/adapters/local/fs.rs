use crate::domain::StorageError;
use crate::ports::storage::ObjectStore;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Object store backed by a local directory, e.g. one served by a web server.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub async fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

fn key_is_valid(key: &str) -> bool {
    !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        if !key_is_valid(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local_path, &dest).await?;
        tracing::debug!(key, dest = %dest.display(), "stored object");
        Ok(self.url_for(key))
    }
}
