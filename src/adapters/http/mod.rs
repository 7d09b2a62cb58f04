//! HTTP inbound adapter.

pub mod error;
pub mod principal;
pub mod videos;

pub use error::ApiError;
pub use principal::{Principal, PRINCIPAL_HEADER};

use crate::application::IngestionService;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router. `media_dir` is served under `/media` when the
/// local object store is in use.
pub fn router(service: Arc<IngestionService>, media_dir: Option<PathBuf>) -> Router {
    let body_limit = service.max_upload_bytes();

    let mut router = Router::new()
        .route("/videos", get(videos::list_videos).post(videos::upload_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service);

    if let Some(dir) = media_dir {
        router = router.nest_service("/media", ServeDir::new(dir));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}
