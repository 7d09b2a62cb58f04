//! Application layer - Generic services that use ports.

pub mod committer;
pub mod ingest;
pub mod publisher;
pub mod transcode;
pub mod upload;
pub mod workspace;

pub use ingest::{Ingested, IngestionRequest, IngestionService};
pub use publisher::{AssetPublisher, FileOutcome, PublishReport};
pub use upload::{UploadSpool, UploadedFile};
pub use workspace::{Workspace, WorkspaceManager};
