use crate::{FileId, GeneratedFile, PanelTab, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the goal text box.
    GoalChanged(String),
    /// User clicked Generate.
    GenerateClicked,
    /// User clicked Clear.
    ClearClicked,
    /// User clicked Download.
    DownloadClicked,
    /// User switched the right-hand panel.
    TabSelected(PanelTab),
    /// User expanded or collapsed a file in the file list.
    FileToggled { file_id: FileId },
    /// Engine finished a generation request.
    GenerationFinished {
        run: RunId,
        result: Result<Vec<GeneratedFile>, String>,
    },
    /// Engine finished assembling the preview for a run.
    PreviewFinished { run: RunId, outcome: PreviewOutcome },
    /// Engine finished writing the archive; `Ok` carries the written path.
    ExportFinished { result: Result<String, String> },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Result of a preview assembly pass as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Built { source: String, html: String },
    NoHtml,
    Failed { source: String, message: String },
}
