use crate::domain::{TranscodeStage, VideoId};
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Output;

/// Runs one external transcoding stage against a work directory.
///
/// Each stage receives the work directory and the video id as positional
/// arguments and writes its outputs into the work directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscodeExecutor: Send + Sync {
    async fn run_stage(
        &self,
        stage: TranscodeStage,
        work_dir: &Path,
        video_id: &VideoId,
    ) -> io::Result<Output>;
}
