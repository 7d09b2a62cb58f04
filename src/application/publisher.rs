//! Uploads the workspace asset set to object storage.

use crate::domain::{PublishError, StorageError, VideoId};
use crate::ports::ObjectStore;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of uploading one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub key: String,
    pub result: Result<String, StorageError>,
}

/// Per-file outcomes of one publish plus the two URLs callers keep.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub original_url: Option<String>,
    pub manifest_url: Option<String>,
    pub files: Vec<FileOutcome>,
}

impl PublishReport {
    pub fn uploaded(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|f| f.result.is_ok())
            .map(|f| f.key.as_str())
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }
}

#[derive(Clone)]
pub struct AssetPublisher {
    store: Arc<dyn ObjectStore>,
    concurrency: usize,
}

impl AssetPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Upload the original and every packaged file of `video_id` found in
    /// `work_dir`. Individual upload failures are recorded, not returned.
    pub async fn publish(
        &self,
        work_dir: &Path,
        video_id: &VideoId,
    ) -> Result<PublishReport, PublishError> {
        let files = collect_asset_set(work_dir, video_id).await?;
        tracing::info!(count = files.len(), "uploading assets");

        let store = &self.store;
        let files: Vec<FileOutcome> = stream::iter(files)
            .map(|(key, path)| async move {
                let result = store.put(&key, &path).await;
                if let Err(e) = &result {
                    tracing::warn!(%key, error = %e, "failed to upload file");
                }
                FileOutcome { key, result }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let original_key = video_id.original_file_name();
        let manifest_key = video_id.manifest_file_name();
        let mut report = PublishReport::default();
        for outcome in &files {
            if let Ok(url) = &outcome.result {
                if outcome.key == original_key {
                    report.original_url = Some(url.clone());
                } else if outcome.key == manifest_key {
                    report.manifest_url = Some(url.clone());
                }
            }
        }
        report.files = files;

        tracing::info!(
            uploaded = report.files.len() - report.failed_count(),
            failed = report.failed_count(),
            "assets uploaded"
        );
        Ok(report)
    }
}

/// The original upload first, then packaged files sorted by name.
async fn collect_asset_set(
    work_dir: &Path,
    video_id: &VideoId,
) -> Result<Vec<(String, PathBuf)>, PublishError> {
    let original = video_id.original_file_name();
    let mut packaged = Vec::new();

    let mut entries = tokio::fs::read_dir(work_dir)
        .await
        .map_err(PublishError::Enumerate)?;
    while let Some(entry) = entries.next_entry().await.map_err(PublishError::Enumerate)? {
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        if video_id.owns_packaged_file(&name) {
            packaged.push((name, entry.path()));
        }
    }
    packaged.sort();

    let mut files = Vec::with_capacity(packaged.len() + 1);
    files.push((original.clone(), work_dir.join(&original)));
    files.extend(packaged);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::storage::MockObjectStore;
    use std::io;
    use tempfile::tempdir;

    fn seed_workspace(dir: &Path, id: &VideoId, extra: &[&str]) {
        std::fs::write(dir.join(id.original_file_name()), b"original").unwrap();
        std::fs::write(dir.join(id.manifest_file_name()), b"<MPD/>").unwrap();
        for name in extra {
            std::fs::write(dir.join(name), b"data").unwrap();
        }
    }

    fn url_for(key: &str) -> String {
        format!("https://cdn.test/{}", key)
    }

    #[tokio::test]
    async fn test_collects_original_and_packaged_files_only() {
        let dir = tempdir().unwrap();
        let id = VideoId::from("vid".to_string());
        seed_workspace(
            dir.path(),
            &id,
            &[
                "vid_video_360_dashinit.mp4",
                "vid_video_360.mp4",
                "other_dash.mpd",
                "notes.txt",
            ],
        );

        let files = collect_asset_set(dir.path(), &id).await.unwrap();
        let keys: Vec<&str> = files.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["vid.mp4", "vid_dash.mpd", "vid_video_360_dashinit.mp4"]
        );
    }

    #[tokio::test]
    async fn test_captures_tracked_urls() {
        let dir = tempdir().unwrap();
        let id = VideoId::from("vid".to_string());
        seed_workspace(dir.path(), &id, &["vid_audio_192_dashinit.mp4"]);

        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .times(3)
            .returning(|key, _| Ok(url_for(key)));

        let publisher = AssetPublisher::new(Arc::new(store), 4);
        let report = publisher.publish(dir.path(), &id).await.unwrap();

        assert_eq!(report.original_url.as_deref(), Some("https://cdn.test/vid.mp4"));
        assert_eq!(
            report.manifest_url.as_deref(),
            Some("https://cdn.test/vid_dash.mpd")
        );
        assert_eq!(report.failed_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_segment_does_not_abort_batch() {
        let dir = tempdir().unwrap();
        let id = VideoId::from("vid".to_string());
        seed_workspace(
            dir.path(),
            &id,
            &["vid_video_360_dashinit.mp4", "vid_video_720_dashinit.mp4"],
        );

        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .withf(|key, _| key == "vid_video_360_dashinit.mp4")
            .times(1)
            .returning(|_, _| Err(StorageError::UploadFailed("timeout".into())));
        store
            .expect_put()
            .withf(|key, _| key != "vid_video_360_dashinit.mp4")
            .times(3)
            .returning(|key, _| Ok(url_for(key)));

        let publisher = AssetPublisher::new(Arc::new(store), 1);
        let report = publisher.publish(dir.path(), &id).await.unwrap();

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.uploaded().count(), 3);
        assert!(report.manifest_url.is_some());
        assert!(report.original_url.is_some());
    }

    #[tokio::test]
    async fn test_failed_manifest_leaves_url_empty() {
        let dir = tempdir().unwrap();
        let id = VideoId::from("vid".to_string());
        seed_workspace(dir.path(), &id, &[]);

        let mut store = MockObjectStore::new();
        store.expect_put().returning(|key, _| {
            if key.ends_with(".mpd") {
                Err(StorageError::Io(io::Error::new(io::ErrorKind::Other, "reset")))
            } else {
                Ok(url_for(key))
            }
        });

        let publisher = AssetPublisher::new(Arc::new(store), 4);
        let report = publisher.publish(dir.path(), &id).await.unwrap();
        assert!(report.manifest_url.is_none());
        assert_eq!(report.original_url.as_deref(), Some("https://cdn.test/vid.mp4"));
    }

    #[tokio::test]
    async fn test_missing_workspace_is_fatal() {
        let dir = tempdir().unwrap();
        let store = MockObjectStore::new();
        let publisher = AssetPublisher::new(Arc::new(store), 4);

        let result = publisher
            .publish(&dir.path().join("gone"), &VideoId::generate())
            .await;
        assert!(matches!(result, Err(PublishError::Enumerate(_))));
    }
}
