//! Local adapters for single-server deployment.

pub mod fs;
pub mod memory;
pub mod script;

pub use fs::FsObjectStore;
pub use memory::InMemoryVideoRepository;
pub use script::ScriptExecutor;
