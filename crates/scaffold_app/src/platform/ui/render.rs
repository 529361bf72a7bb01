use std::path::PathBuf;

use scaffold_core::{AgentStatus, AppViewModel, FileRowView, LogEntry, LogId, PanelTab};

/// Turns successive view models into terminal lines, printing only what changed.
pub struct Renderer {
    preview_path: PathBuf,
    last: AppViewModel,
    last_log_id: LogId,
}

impl Renderer {
    pub fn new(preview_path: PathBuf) -> Self {
        Self {
            preview_path,
            last: AppViewModel {
                input_enabled: true,
                ..AppViewModel::default()
            },
            last_log_id: 0,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        for entry in view.logs.iter().filter(|e| e.id > self.last_log_id) {
            lines.push(format_log(entry));
        }
        if let Some(last) = view.logs.last() {
            self.last_log_id = self.last_log_id.max(last.id);
        }

        if view.status != self.last.status {
            lines.push(format!("── status: {}", status_label(view.status)));
        }

        if view.error != self.last.error {
            if let Some(error) = &view.error {
                lines.push(format!("!! {error}"));
            }
        }

        if file_ids(&view.files) != file_ids(&self.last.files) && !view.files.is_empty() {
            lines.extend(render_files(view));
        } else {
            for row in &view.files {
                let was_open = self
                    .last
                    .files
                    .iter()
                    .any(|old| old.file_id == row.file_id && old.content.is_some());
                if let (Some(content), false) = (&row.content, was_open) {
                    lines.extend(render_content(&row.filename, content));
                }
            }
        }

        if view.active_tab != self.last.active_tab || view.preview_html != self.last.preview_html
        {
            if let (PanelTab::Preview, Some(html)) = (view.active_tab, &view.preview_html) {
                lines.push(format!(
                    "── preview ready ({} bytes): {}",
                    html.len(),
                    self.preview_path.display()
                ));
            } else if view.active_tab == PanelTab::Logs && self.last.active_tab == PanelTab::Preview {
                lines.push("── showing logs".to_string());
            }
        }

        if view.can_download && !self.last.can_download {
            lines.push("── :download writes the project archive".to_string());
        }

        self.last = view.clone();
        lines
    }
}

/// File list panel, one numbered row per file plus any expanded content.
pub fn render_files(view: &AppViewModel) -> Vec<String> {
    if view.files.is_empty() {
        return vec!["(no files generated yet)".to_string()];
    }
    let mut lines = vec![format!("Generated project files ({}):", view.files.len())];
    for (index, row) in view.files.iter().enumerate() {
        let marker = if row.content.is_some() { "▾" } else { "▸" };
        lines.push(format!(
            "  {marker} [{}] {} ({} bytes)",
            index + 1,
            row.filename,
            row.byte_len
        ));
        if let Some(content) = &row.content {
            lines.extend(render_content(&row.filename, content));
        }
    }
    lines
}

fn render_content(filename: &str, content: &str) -> Vec<String> {
    let mut lines = vec![format!("    ┌─ {filename}")];
    lines.extend(content.lines().map(|line| format!("    │ {line}")));
    lines.push("    └─".to_string());
    lines
}

fn format_log(entry: &LogEntry) -> String {
    format!(
        "{} {:<13} {}",
        entry.timestamp,
        format!("[{}]", entry.kind.as_str()),
        entry.message
    )
}

fn status_label(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Idle => "IDLE",
        AgentStatus::Generating => "GENERATING",
        AgentStatus::Completed => "COMPLETED",
        AgentStatus::Error => "ERROR",
    }
}

fn file_ids(rows: &[FileRowView]) -> Vec<u64> {
    rows.iter().map(|row| row.file_id).collect()
}
