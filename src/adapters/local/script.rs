use crate::config::TranscoderConfig;
use crate::domain::{TranscodeStage, VideoId};
use crate::ports::transcoder::TranscodeExecutor;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command as TokioCommand;

/// Runs each stage as an external executable: `<stage> <work_dir> <video_id>`.
#[derive(Clone, Debug)]
pub struct ScriptExecutor {
    sample_stage: PathBuf,
    package_stage: PathBuf,
}

impl ScriptExecutor {
    pub fn new(config: &TranscoderConfig) -> Self {
        Self {
            sample_stage: config.sample_stage.clone(),
            package_stage: config.package_stage.clone(),
        }
    }

    fn program(&self, stage: TranscodeStage) -> &Path {
        match stage {
            TranscodeStage::Sample => &self.sample_stage,
            TranscodeStage::Package => &self.package_stage,
        }
    }
}

#[async_trait]
impl TranscodeExecutor for ScriptExecutor {
    async fn run_stage(
        &self,
        stage: TranscodeStage,
        work_dir: &Path,
        video_id: &VideoId,
    ) -> io::Result<Output> {
        TokioCommand::new(self.program(stage))
            .arg(work_dir)
            .arg(video_id.as_str())
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .output()
            .await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn executor(sample: &str, package: &str) -> ScriptExecutor {
        ScriptExecutor::new(&TranscoderConfig {
            sample_stage: PathBuf::from(sample),
            package_stage: PathBuf::from(package),
        })
    }

    #[tokio::test]
    async fn test_stage_runs_in_work_dir_with_positional_args() {
        let work = tempdir().unwrap();
        let id = VideoId::from("vid_dash.mpd".to_string());

        // `touch <work_dir> <id>` creates the id relative to the current dir
        let out = executor("false", "touch")
            .run_stage(TranscodeStage::Package, work.path(), &id)
            .await
            .unwrap();
        assert!(out.status.success());
        assert!(work.path().join("vid_dash.mpd").exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let work = tempdir().unwrap();
        let id = VideoId::from("missing-file".to_string());

        let out = executor("ls", "touch")
            .run_stage(TranscodeStage::Sample, work.path(), &id)
            .await
            .unwrap();
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("missing-file"));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let work = tempdir().unwrap();
        let absent = work.path().join("absent.sh");
        let absent = absent.to_str().unwrap();
        let result = executor(absent, absent)
            .run_stage(TranscodeStage::Package, work.path(), &VideoId::generate())
            .await;
        assert!(result.is_err());
    }
}
