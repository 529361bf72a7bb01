use scaffold_core::{Msg, PanelTab};

pub const HELP: &str = "\
Type a project goal and press Enter to set it, then :generate.
  :generate [goal]   generate a project (optionally setting the goal first)
  :clear             reset goal, files, logs and preview
  :download          write ai_generated_project.zip to the output directory
  :files             list generated files
  :open <n>          expand or collapse file number n
  :logs / :preview   switch the right-hand panel
  :help              show this help
  :quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Dispatch(Vec<Msg>),
    /// 1-based position in the file list.
    ToggleFile(usize),
    ShowFiles,
    Help,
    Quit,
    Unknown(String),
}

/// Maps one line of terminal input to a command.
pub fn parse_line(line: &str) -> UiCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        if line.trim().is_empty() {
            return UiCommand::Dispatch(Vec::new());
        }
        return UiCommand::Dispatch(vec![Msg::GoalChanged(line.to_string())]);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "generate" | "g" => {
            let mut msgs = Vec::with_capacity(2);
            if !arg.is_empty() {
                msgs.push(Msg::GoalChanged(arg.to_string()));
            }
            msgs.push(Msg::GenerateClicked);
            UiCommand::Dispatch(msgs)
        }
        "clear" => UiCommand::Dispatch(vec![Msg::ClearClicked]),
        "download" | "d" => UiCommand::Dispatch(vec![Msg::DownloadClicked]),
        "logs" => UiCommand::Dispatch(vec![Msg::TabSelected(PanelTab::Logs)]),
        "preview" => UiCommand::Dispatch(vec![Msg::TabSelected(PanelTab::Preview)]),
        "files" | "f" => UiCommand::ShowFiles,
        "open" | "o" => match arg.parse::<usize>() {
            Ok(index) if index > 0 => UiCommand::ToggleFile(index),
            _ => UiCommand::Unknown(format!(":open needs a file number, got `{arg}`")),
        },
        "help" | "h" | "?" => UiCommand::Help,
        "quit" | "q" | "exit" => UiCommand::Quit,
        other => UiCommand::Unknown(format!("unknown command `:{other}` (try :help)")),
    }
}
