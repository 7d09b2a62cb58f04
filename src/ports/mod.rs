//! Ports - Capability traits the pipeline depends on.

pub mod repository;
pub mod storage;
pub mod transcoder;

pub use repository::VideoRepository;
pub use storage::ObjectStore;
pub use transcoder::TranscodeExecutor;
