use crate::{ProjectFile, RunId};

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the model service for a project matching `goal`.
    Generate { run: RunId, goal: String },
    /// Assemble a self-contained preview out of the generated files.
    BuildPreview { run: RunId, files: Vec<ProjectFile> },
    /// Package the files into the downloadable archive.
    ExportArchive { files: Vec<ProjectFile> },
}
