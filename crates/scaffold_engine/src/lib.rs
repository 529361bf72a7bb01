//! Scaffolder engine: model client, preview assembly, archive export and the
//! background worker that runs them.
mod archive;
mod config;
mod engine;
mod generate;
mod persist;
mod preview;
mod prompt;
mod response;
mod types;

pub use archive::{build_archive, export_archive, ArchiveError, ArchiveSummary, ARCHIVE_FILENAME};
pub use config::{EngineConfig, GenerationSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use engine::{EngineError, EngineHandle};
pub use generate::{GeminiGenerator, GenerateError, ProjectGenerator};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{build_preview, entry_point, Preview, PreviewError, PreviewFailure};
pub use prompt::{build_prompt, response_schema};
pub use response::parse_project_files;
pub use types::{EngineEvent, GeneratedFile, RunId};
