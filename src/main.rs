use anyhow::Context;
use cinereel::adapters::http;
use cinereel::adapters::local::{FsObjectStore, InMemoryVideoRepository, ScriptExecutor};
use cinereel::config::{AppConfig, StorageConfig};
use cinereel::ports::{ObjectStore, VideoRepository};
use cinereel::IngestionService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // after the subscriber, so rejected values are logged
    let config = AppConfig::from_env();

    let (store, media_dir) = object_store(&config).await?;
    let repo = video_repository(&config).await?;
    let executor = Arc::new(ScriptExecutor::new(&config.transcoder));

    let service = Arc::new(IngestionService::new(
        config.workspace_root.clone(),
        executor,
        store,
        repo,
        config.publish_concurrency,
        config.max_upload_bytes,
    ));

    let app = http::router(service, media_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    tracing::info!(
        addr = %config.bind_address(),
        max_upload_bytes = config.max_upload_bytes,
        "listening"
    );
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}

async fn object_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ObjectStore>, Option<PathBuf>)> {
    match &config.storage {
        StorageConfig::Local {
            root,
            public_base_url,
        } => {
            let store = FsObjectStore::new(root.clone(), public_base_url.clone())
                .await
                .with_context(|| format!("cannot use storage dir {}", root.display()))?;
            tracing::info!(root = %root.display(), "using local object store");
            let store: Arc<dyn ObjectStore> = Arc::new(store);
            Ok((store, Some(root.clone())))
        }
        #[cfg(feature = "aws")]
        StorageConfig::S3 {
            bucket,
            region,
            endpoint_url,
        } => {
            let store = cinereel::adapters::aws::S3Adapter::from_env(
                bucket.clone(),
                region.clone(),
                endpoint_url.clone(),
            )
            .await;
            tracing::info!(%bucket, %region, "using s3 object store");
            let store: Arc<dyn ObjectStore> = Arc::new(store);
            Ok((store, None))
        }
        #[cfg(not(feature = "aws"))]
        StorageConfig::S3 { .. } => {
            anyhow::bail!("S3_BUCKET is set but this build lacks the `aws` feature")
        }
    }
}

async fn video_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn VideoRepository>> {
    match &config.database_url {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let repo = cinereel::adapters::postgres::PgVideoRepository::connect(url)
                .await
                .context("cannot connect to postgres")?;
            tracing::info!("using postgres metadata store");
            let repo: Arc<dyn VideoRepository> = Arc::new(repo);
            Ok(repo)
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            anyhow::bail!("DATABASE_URL is set but this build lacks the `postgres` feature")
        }
        None => {
            tracing::warn!("DATABASE_URL not set, video records are kept in memory");
            let repo: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::new());
            Ok(repo)
        }
    }
}
