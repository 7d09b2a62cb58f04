//! Configuration resolved once at start-up from environment variables.

use std::env;
use std::path::PathBuf;

/// 100 MiB for the video plus 1 MiB for the other form fields.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 101 * 1024 * 1024;

/// Settings shared by the HTTP layer and the ingestion pipeline.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Parent directory of per-ingestion workspaces
    pub workspace_root: PathBuf,
    /// Ceiling on the whole multipart body
    pub max_upload_bytes: usize,
    pub transcoder: TranscoderConfig,
    /// Maximum concurrent uploads within one publish
    pub publish_concurrency: usize,
    pub storage: StorageConfig,
    /// Postgres connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
}

/// Paths of the two external transcoding stage executables.
#[derive(Clone, Debug)]
pub struct TranscoderConfig {
    pub sample_stage: PathBuf,
    pub package_stage: PathBuf,
}

#[derive(Clone, Debug)]
pub enum StorageConfig {
    /// Copy assets into a local directory served under `public_base_url`
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    /// Upload assets to an S3 (or S3-compatible) bucket
    S3 {
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    },
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let storage = match env::var("S3_BUCKET") {
            Ok(bucket) if !bucket.is_empty() => StorageConfig::S3 {
                bucket,
                region: env::var("AWS_REGION").unwrap_or_else(|_| String::from("us-east-1")),
                endpoint_url: env::var("S3_ENDPOINT_URL").ok(),
            },
            _ => StorageConfig::Local {
                root: PathBuf::from(
                    env::var("STORAGE_DIR").unwrap_or_else(|_| String::from("./media")),
                ),
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| String::from("http://127.0.0.1:3000/media")),
            },
        };

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3000")),
            workspace_root: env::var("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            transcoder: TranscoderConfig {
                sample_stage: PathBuf::from(
                    env::var("SAMPLE_STAGE_PATH")
                        .unwrap_or_else(|_| String::from("./scripts/gen-samples.sh")),
                ),
                package_stage: PathBuf::from(
                    env::var("PACKAGE_STAGE_PATH")
                        .unwrap_or_else(|_| String::from("./scripts/gen-mpeg-dash.sh")),
                ),
            },
            publish_concurrency: parse_or("PUBLISH_CONCURRENCY", 4usize).max(1),
            storage,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable config value, using default");
            default
        }),
        Err(_) => default,
    }
}
