//! PostgreSQL metadata store.

use crate::domain::{RepositoryError, VideoId, VideoRecord};
use crate::ports::repository::VideoRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(backend)?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

fn backend(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Backend(err.to_string())
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip_all, fields(db.table = "videos", db.operation = "insert", video_id = %record.video_id))]
    async fn insert(&self, record: &VideoRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO videos (video_id, title, original_video_url, video_mpd_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.video_id.as_str())
        .bind(&record.title)
        .bind(&record.original_video_url)
        .bind(&record.video_mpd_url)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RepositoryError::Duplicate(record.video_id.to_string());
                }
            }
            backend(e)
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<VideoRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT video_id, title, original_video_url, video_mpd_url, created_at \
             FROM videos ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let video_id: String = row.try_get("video_id").map_err(backend)?;
            let created_at: DateTime<Utc> = row.try_get("created_at").map_err(backend)?;
            records.push(VideoRecord {
                video_id: VideoId::from(video_id),
                title: row.try_get("title").map_err(backend)?,
                original_video_url: row.try_get("original_video_url").map_err(backend)?,
                video_mpd_url: row.try_get("video_mpd_url").map_err(backend)?,
                created_at,
            });
        }
        Ok(records)
    }
}
