//! Domain layer - Pure business logic.

pub mod error;
pub mod stage;
pub mod video;

pub use error::{
    IngestError, PublishError, RepositoryError, StorageError, TranscodeError, TranscodeStage,
    ValidationError,
};
pub use stage::{IngestStage, StageTrail};
pub use video::{Title, VideoId, VideoRecord};
