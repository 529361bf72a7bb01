use std::collections::BTreeSet;

use crate::view_model::{AppViewModel, FileRowView};

pub type FileId = u64;
pub type LogId = u64;
pub type RunId = u64;

/// Produces the human-readable timestamp stamped on each log entry.
pub type Clock = fn() -> String;

/// Wall-clock time of day, e.g. `14:03:27`.
pub fn local_time_clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    #[default]
    Idle,
    Generating,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Error,
    Output,
    Instruction,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Info => "INFO",
            LogKind::Success => "SUCCESS",
            LogKind::Error => "ERROR",
            LogKind::Output => "OUTPUT",
            LogKind::Instruction => "INSTRUCTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: LogId,
    pub timestamp: String,
    pub kind: LogKind,
    pub message: String,
}

/// A file as returned by the model service, before it joins the project.
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub id: FileId,
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTab {
    #[default]
    Logs,
    Preview,
}

#[derive(Debug, Clone)]
pub struct AppState {
    goal: String,
    files: Vec<ProjectFile>,
    logs: Vec<LogEntry>,
    status: AgentStatus,
    error: Option<String>,
    preview: Option<String>,
    tab: PanelTab,
    expanded: BTreeSet<FileId>,
    run: RunId,
    next_file_id: FileId,
    next_log_id: LogId,
    dirty: bool,
    clock: Clock,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_clock(local_time_clock)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            goal: String::new(),
            files: Vec::new(),
            logs: Vec::new(),
            status: AgentStatus::Idle,
            error: None,
            preview: None,
            tab: PanelTab::Logs,
            expanded: BTreeSet::new(),
            run: 0,
            next_file_id: 1,
            next_log_id: 1,
            dirty: false,
            clock,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let generating = self.status == AgentStatus::Generating;
        AppViewModel {
            goal: self.goal.clone(),
            status: self.status,
            error: self.error.clone(),
            files: self
                .files
                .iter()
                .map(|file| FileRowView {
                    file_id: file.id,
                    filename: file.filename.clone(),
                    byte_len: file.content.len(),
                    content: self
                        .expanded
                        .contains(&file.id)
                        .then(|| file.content.clone()),
                })
                .collect(),
            logs: self.logs.clone(),
            preview_html: self.preview.clone(),
            active_tab: self.tab,
            input_enabled: !generating,
            can_generate: !generating && !self.goal.trim().is_empty(),
            can_download: self.status == AgentStatus::Completed || !self.files.is_empty(),
            dirty: self.dirty,
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn active_tab(&self) -> PanelTab {
        self.tab
    }

    /// Identifier of the current generation run; bumped on every submit and clear.
    pub fn run(&self) -> RunId {
        self.run
    }

    /// Returns whether state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_goal(&mut self, goal: String) {
        self.goal = goal;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.mark_dirty();
    }

    pub(crate) fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
        self.mark_dirty();
    }

    pub(crate) fn set_preview(&mut self, preview: Option<String>) {
        if preview.is_none() && self.tab == PanelTab::Preview {
            self.tab = PanelTab::Logs;
        }
        self.preview = preview;
        self.mark_dirty();
    }

    pub(crate) fn select_tab(&mut self, tab: PanelTab) -> bool {
        if tab == PanelTab::Preview && self.preview.is_none() {
            return false;
        }
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        self.mark_dirty();
        true
    }

    pub(crate) fn toggle_expanded(&mut self, file_id: FileId) {
        if !self.files.iter().any(|f| f.id == file_id) {
            return;
        }
        if !self.expanded.remove(&file_id) {
            self.expanded.insert(file_id);
        }
        self.mark_dirty();
    }

    pub(crate) fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
        let id = self.next_log_id;
        self.next_log_id += 1;
        self.logs.push(LogEntry {
            id,
            timestamp: (self.clock)(),
            kind,
            message: message.into(),
        });
        self.mark_dirty();
    }

    /// Replaces the file list wholesale, assigning fresh identifiers.
    pub(crate) fn replace_files(&mut self, generated: Vec<GeneratedFile>) {
        self.expanded.clear();
        self.files = generated
            .into_iter()
            .map(|file| {
                let id = self.next_file_id;
                self.next_file_id += 1;
                ProjectFile {
                    id,
                    filename: file.filename,
                    content: file.content,
                }
            })
            .collect();
        self.mark_dirty();
    }

    /// Drops the previous run's results and starts a new run.
    pub(crate) fn begin_run(&mut self) -> RunId {
        self.files.clear();
        self.logs.clear();
        self.expanded.clear();
        self.preview = None;
        self.error = None;
        self.tab = PanelTab::Logs;
        self.run += 1;
        self.mark_dirty();
        self.run
    }

    /// Resets everything to the initial idle state; any in-flight run is orphaned.
    pub(crate) fn reset(&mut self) {
        self.begin_run();
        self.goal.clear();
        self.status = AgentStatus::Idle;
    }
}
