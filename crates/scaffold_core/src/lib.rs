//! Scaffolder core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, PreviewOutcome};
pub use state::{
    local_time_clock, AgentStatus, AppState, Clock, FileId, GeneratedFile, LogEntry, LogId,
    LogKind, PanelTab, ProjectFile, RunId,
};
pub use update::update;
pub use view_model::{AppViewModel, FileRowView};
