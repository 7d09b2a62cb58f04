//! Cinereel - Video ingestion service
//!
//! Turns one uploaded video into a published, queryable record:
//! save into a private workspace, run the external transcoding stages,
//! upload the asset set to object storage, commit the metadata row.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (ids, titles, records, stages, errors)
//! - ports/: Trait definitions (object store, metadata store, transcoder)
//! - adapters/: Concrete implementations (local fs, S3, Postgres, HTTP)
//! - application/: Ingestion pipeline services
//! - config: Environment configuration
//!
//! # Features
//! - `aws`: S3 object store
//! - `postgres`: PostgreSQL metadata store
//! - `full`: All features

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use application::{IngestionRequest, IngestionService};
pub use config::AppConfig;
