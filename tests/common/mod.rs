//! Fakes and helpers shared by the HTTP-level tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use cinereel::adapters::http::{router, PRINCIPAL_HEADER};
use cinereel::adapters::local::InMemoryVideoRepository;
use cinereel::domain::{StorageError, TranscodeStage, VideoId};
use cinereel::ports::{ObjectStore, TranscodeExecutor};
use cinereel::IngestionService;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const BOUNDARY: &str = "cinereel-test-boundary";

fn output(success: bool, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(if success { 0 } else { 1 << 8 }),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Drops fixture files into the work dir the way the packaging scripts do.
#[derive(Default)]
pub struct FixtureTranscoder {
    pub fail_sample: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl TranscodeExecutor for FixtureTranscoder {
    async fn run_stage(
        &self,
        stage: TranscodeStage,
        work_dir: &Path,
        video_id: &VideoId,
    ) -> io::Result<Output> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match stage {
            TranscodeStage::Sample if self.fail_sample => Ok(output(false, "moov atom not found")),
            TranscodeStage::Sample => {
                tokio::fs::write(work_dir.join(format!("{}_video_360.mp4", video_id)), b"r")
                    .await?;
                Ok(output(true, ""))
            }
            TranscodeStage::Package => {
                tokio::fs::write(work_dir.join(video_id.manifest_file_name()), b"<MPD/>").await?;
                for name in ["video_360", "audio_192"] {
                    let segment = work_dir.join(format!("{}_{}_dashinit.mp4", video_id, name));
                    tokio::fs::write(segment, b"segment").await?;
                }
                Ok(output(true, ""))
            }
        }
    }
}

/// Records every key it is asked to store; fails keys with a given suffix.
#[derive(Default)]
pub struct RecordingStore {
    pub fail_suffix: Option<&'static str>,
    pub keys: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        self.keys.lock().unwrap().push(key.to_string());
        if self.fail_suffix.is_some_and(|suffix| key.ends_with(suffix)) {
            return Err(StorageError::UploadFailed("connection reset".into()));
        }
        tokio::fs::metadata(local_path).await?;
        Ok(format!("https://cdn.test/videos/{}", key))
    }
}

pub struct TestApp {
    pub app: Router,
    pub workspace_root: TempDir,
    pub transcoder: Arc<FixtureTranscoder>,
    pub store: Arc<RecordingStore>,
}

impl TestApp {
    pub fn new(transcoder: FixtureTranscoder, store: RecordingStore, max_upload_bytes: usize) -> Self {
        let workspace_root = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(transcoder);
        let store = Arc::new(store);
        let service = Arc::new(IngestionService::new(
            workspace_root.path(),
            transcoder.clone(),
            store.clone(),
            Arc::new(InMemoryVideoRepository::new()),
            4,
            max_upload_bytes,
        ));
        Self {
            app: router(service, None),
            workspace_root,
            transcoder,
            store,
        }
    }

    pub fn default_app() -> Self {
        Self::new(
            FixtureTranscoder::default(),
            RecordingStore::default(),
            cinereel::config::DEFAULT_MAX_UPLOAD_BYTES,
        )
    }

    pub fn workspace_entries(&self) -> usize {
        std::fs::read_dir(self.workspace_root.path()).unwrap().count()
    }

    pub fn transcoder_calls(&self) -> usize {
        self.transcoder.calls.load(Ordering::SeqCst)
    }
}

/// Multipart body with an optional title and an optional file field.
pub fn multipart_body(title: Option<&str>, file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(title) = title {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"videoFile\"; filename=\"clip.mp4\"\r\nContent-Type: video/mp4\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Multipart body with the file field ahead of the title.
pub fn multipart_body_file_first(title: &str, file: &[u8]) -> Vec<u8> {
    let mut body = multipart_body(None, Some(file));
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    body
}

pub fn upload_request(body: Vec<u8>, principal: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/videos")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len());
    if let Some(principal) = principal {
        builder = builder.header(PRINCIPAL_HEADER, principal);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn list_request() -> Request<Body> {
    Request::builder()
        .uri("/videos")
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
