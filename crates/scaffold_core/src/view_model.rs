use crate::{AgentStatus, FileId, LogEntry, PanelTab};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub goal: String,
    pub status: AgentStatus,
    pub error: Option<String>,
    pub files: Vec<FileRowView>,
    pub logs: Vec<LogEntry>,
    pub preview_html: Option<String>,
    pub active_tab: PanelTab,
    /// Goal entry is locked while a generation is in flight.
    pub input_enabled: bool,
    pub can_generate: bool,
    pub can_download: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub file_id: FileId,
    pub filename: String,
    pub byte_len: usize,
    /// Present only while the row is expanded.
    pub content: Option<String>,
}
