//! `/videos` handlers.

use super::error::ApiError;
use super::principal::Principal;
use crate::application::{IngestionRequest, IngestionService, UploadedFile};
use crate::domain::{IngestError, Title, ValidationError, VideoRecord};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const FILE_FIELD: &str = "videoFile";
pub const TITLE_FIELD: &str = "title";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoJson {
    pub video_id: String,
    pub title: String,
    pub video_mpd_url: String,
    /// Unix seconds
    pub created_at: i64,
}

impl From<&VideoRecord> for VideoJson {
    fn from(record: &VideoRecord) -> Self {
        Self {
            video_id: record.video_id.to_string(),
            title: record.title.clone(),
            video_mpd_url: record.video_mpd_url.clone(),
            created_at: record.created_at.timestamp(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoList {
    pub videos: Vec<VideoJson>,
}

pub async fn list_videos(
    State(service): State<Arc<IngestionService>>,
) -> Result<Json<VideoList>, ApiError> {
    let records = service.list().await?;
    Ok(Json(VideoList {
        videos: records.iter().map(VideoJson::from).collect(),
    }))
}

pub async fn upload_video(
    State(service): State<Arc<IngestionService>>,
    Principal(principal): Principal,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VideoJson>), ApiError> {
    let (file, title) = match read_upload_form(&service, multipart).await {
        Ok(form) => form,
        Err(e) if e.is_client_error() => {
            tracing::info!(%principal, error = %e, "new upload failed - bad request");
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!(%principal, error = %e, "cannot receive upload");
            return Err(e.into());
        }
    };

    let request = IngestionRequest {
        file,
        title,
        principal,
    };
    // Detached: a dropped client connection must not interrupt the pipeline.
    let ingested = tokio::spawn(async move { service.ingest(request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("ingest task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(VideoJson::from(&ingested.record))))
}

/// Spool the file field to disk and read the title. The ceiling is enforced
/// per chunk; a bad title sent ahead of the file is rejected before any file
/// bytes are read.
async fn read_upload_form(
    service: &IngestionService,
    mut multipart: Multipart,
) -> Result<(UploadedFile, String), IngestError> {
    let limit = service.max_upload_bytes();
    let mut file = None;
    let mut title = String::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, limit))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let mut spool = service.spool().map_err(IngestError::Save)?;
                while let Some(chunk) = field.chunk().await.map_err(|e| form_error(e, limit))? {
                    spool.write(&chunk).await?;
                }
                file = Some(spool.finish().await?);
            }
            Some(TITLE_FIELD) => {
                let text = field.text().await.map_err(|e| form_error(e, limit))?;
                title = Title::parse(text)?.into_inner();
            }
            _ => continue,
        }
    }

    let file = file.ok_or(ValidationError::FileMissing)?;
    Ok((file, title))
}

fn form_error(err: MultipartError, limit: usize) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge { limit }
    } else {
        ValidationError::MalformedForm(err.body_text())
    }
}
