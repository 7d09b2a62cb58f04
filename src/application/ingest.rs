//! Sequences one upload through save, transcode, publish and commit.

use super::committer::RecordCommitter;
use super::publisher::{AssetPublisher, PublishReport};
use super::transcode::TranscodeInvoker;
use super::upload::{UploadSpool, UploadedFile};
use super::workspace::{Workspace, WorkspaceManager};
use crate::domain::{
    IngestError, IngestStage, RepositoryError, StageTrail, Title, VideoId, VideoRecord,
};
use crate::ports::{ObjectStore, TranscodeExecutor, VideoRepository};
use chrono::Utc;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug)]
pub struct IngestionRequest {
    pub file: UploadedFile,
    pub title: String,
    /// Authenticated uploader, used for attribution only
    pub principal: String,
}

/// A completed ingestion.
#[derive(Debug)]
pub struct Ingested {
    pub record: VideoRecord,
    pub publish: PublishReport,
    pub stages: Vec<IngestStage>,
}

pub struct IngestionService {
    workspaces: WorkspaceManager,
    transcoder: TranscodeInvoker,
    publisher: AssetPublisher,
    committer: RecordCommitter,
    repo: Arc<dyn VideoRepository>,
    max_upload_bytes: usize,
}

impl IngestionService {
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        executor: Arc<dyn TranscodeExecutor>,
        store: Arc<dyn ObjectStore>,
        repo: Arc<dyn VideoRepository>,
        publish_concurrency: usize,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            workspaces: WorkspaceManager::new(workspace_root),
            transcoder: TranscodeInvoker::new(executor),
            publisher: AssetPublisher::new(store, publish_concurrency),
            committer: RecordCommitter::new(repo.clone()),
            repo,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Stage a new upload next to the workspaces, bounded by the upload ceiling.
    pub fn spool(&self) -> io::Result<UploadSpool> {
        UploadSpool::new(self.workspaces.root(), self.max_upload_bytes)
    }

    pub async fn list(&self) -> Result<Vec<VideoRecord>, RepositoryError> {
        self.repo.list_all().await
    }

    pub async fn ingest(&self, request: IngestionRequest) -> Result<Ingested, IngestError> {
        let span = tracing::info_span!(
            "ingest",
            principal = %request.principal,
            video_id = tracing::field::Empty
        );
        let result = self.run(request).instrument(span.clone()).await;
        let _entered = span.enter();
        match &result {
            Ok(done) => tracing::info!(title = %done.record.title, "new upload successful"),
            Err(e) if e.is_client_error() => tracing::info!(error = %e, "upload rejected"),
            Err(e) => tracing::error!(step = e.failed_step(), error = %e, "upload failed"),
        }
        result
    }

    async fn run(&self, request: IngestionRequest) -> Result<Ingested, IngestError> {
        let mut trail = StageTrail::start();
        let IngestionRequest { file, title, .. } = request;

        // the size ceiling was enforced while the upload was spooled
        let title = Title::parse(title)?;

        let workspace = self.workspaces.open().map_err(IngestError::Workspace)?;
        trail.advance(IngestStage::WorkspaceOpen);

        let result = self.process(&workspace, title, file, &mut trail).await;
        workspace.close();

        let (record, publish) = result?;
        trail.advance(IngestStage::Done);
        Ok(Ingested {
            record,
            publish,
            stages: trail.into_visited(),
        })
    }

    async fn process(
        &self,
        workspace: &Workspace,
        title: Title,
        file: UploadedFile,
        trail: &mut StageTrail,
    ) -> Result<(VideoRecord, PublishReport), IngestError> {
        let video_id = VideoId::generate();
        tracing::Span::current().record("video_id", video_id.as_str());

        let video_path = workspace.join(&video_id.original_file_name());
        tracing::info!(bytes = file.len(), "saving input file");
        file.persist(&video_path).await.map_err(IngestError::Save)?;
        trail.advance(IngestStage::InputSaved);

        self.transcoder.run(workspace.path(), &video_id).await?;
        trail.advance(IngestStage::Transcoded);

        let report = self.publisher.publish(workspace.path(), &video_id).await?;
        trail.advance(IngestStage::Published);

        let original_url = report.original_url.clone().unwrap_or_default();
        let manifest_url = report.manifest_url.clone().unwrap_or_default();
        if manifest_url.is_empty() {
            tracing::warn!("manifest was not published, recording an empty manifest url");
        }

        let record = match self
            .committer
            .commit(
                &video_id,
                title.as_str(),
                &original_url,
                &manifest_url,
                Utc::now(),
            )
            .await
        {
            Ok(record) => record,
            Err(e) => {
                let orphaned: Vec<&str> = report.uploaded().collect();
                tracing::error!(?orphaned, "uploaded objects have no video record");
                return Err(e.into());
            }
        };
        trail.advance(IngestStage::Committed);

        Ok((record, report))
    }
}
