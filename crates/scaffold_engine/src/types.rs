use crate::{ArchiveError, ArchiveSummary, GenerateError, Preview, PreviewError};

pub type RunId = u64;

/// One file of a generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub enum EngineEvent {
    GenerationCompleted {
        run: RunId,
        result: Result<Vec<GeneratedFile>, GenerateError>,
    },
    PreviewCompleted {
        run: RunId,
        result: Result<Option<Preview>, PreviewError>,
    },
    ExportCompleted {
        result: Result<Option<ArchiveSummary>, ArchiveError>,
    },
}
