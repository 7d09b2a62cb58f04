use crate::domain::{TranscodeError, TranscodeStage, VideoId};
use crate::ports::TranscodeExecutor;
use std::path::Path;
use std::sync::Arc;

/// Runs the sample and package stages in order against one workspace.
#[derive(Clone)]
pub struct TranscodeInvoker {
    executor: Arc<dyn TranscodeExecutor>,
}

impl TranscodeInvoker {
    pub fn new(executor: Arc<dyn TranscodeExecutor>) -> Self {
        Self { executor }
    }

    pub async fn run(&self, work_dir: &Path, video_id: &VideoId) -> Result<(), TranscodeError> {
        for stage in [TranscodeStage::Sample, TranscodeStage::Package] {
            self.run_stage(stage, work_dir, video_id).await?;
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        stage: TranscodeStage,
        work_dir: &Path,
        video_id: &VideoId,
    ) -> Result<(), TranscodeError> {
        tracing::info!(%stage, "running transcode stage");
        let output = self
            .executor
            .run_stage(stage, work_dir, video_id)
            .await
            .map_err(|source| TranscodeError::Spawn { stage, source })?;

        if !output.status.success() {
            return Err(TranscodeError::Exited {
                stage,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tracing::info!(%stage, "transcode stage finished");
        Ok(())
    }
}
