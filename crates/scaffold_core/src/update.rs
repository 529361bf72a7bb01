use crate::{AgentStatus, AppState, Effect, GeneratedFile, LogKind, Msg, PreviewOutcome, RunId};

const EMPTY_GOAL_MESSAGE: &str = "Please enter a goal.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::GoalChanged(goal) => {
            if state.status() != AgentStatus::Generating {
                state.set_goal(goal);
                if state.error().is_some() {
                    state.set_error(None);
                }
            }
            Vec::new()
        }
        Msg::GenerateClicked => submit_goal(&mut state),
        Msg::ClearClicked => {
            state.reset();
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.files().is_empty() {
                return (state, Vec::new());
            }
            state.push_log(LogKind::Info, "Creating zip archive...");
            vec![Effect::ExportArchive {
                files: state.files().to_vec(),
            }]
        }
        Msg::TabSelected(tab) => {
            state.select_tab(tab);
            Vec::new()
        }
        Msg::FileToggled { file_id } => {
            state.toggle_expanded(file_id);
            Vec::new()
        }
        Msg::GenerationFinished { run, result } => {
            if run != state.run() || state.status() != AgentStatus::Generating {
                return (state, Vec::new());
            }
            match result {
                Ok(files) => apply_generated(&mut state, run, files),
                Err(message) => {
                    state.set_error(Some(message.clone()));
                    state.push_log(LogKind::Error, message);
                    state.set_status(AgentStatus::Error);
                    Vec::new()
                }
            }
        }
        Msg::PreviewFinished { run, outcome } => {
            if run == state.run() {
                apply_preview(&mut state, outcome);
            }
            Vec::new()
        }
        Msg::ExportFinished { result } => {
            match result {
                Ok(path) => {
                    state.push_log(LogKind::Success, "Project zip file downloaded.");
                    state.push_log(LogKind::Output, format!("Saved archive to {path}"));
                }
                Err(message) => {
                    state.set_error(Some(message.clone()));
                    state.push_log(LogKind::Error, message);
                }
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_goal(state: &mut AppState) -> Vec<Effect> {
    if state.status() == AgentStatus::Generating {
        return Vec::new();
    }
    if state.goal().trim().is_empty() {
        state.set_error(Some(EMPTY_GOAL_MESSAGE.to_string()));
        return Vec::new();
    }

    let run = state.begin_run();
    state.set_status(AgentStatus::Generating);
    let goal = state.goal().to_string();
    state.push_log(
        LogKind::Info,
        format!("Generating project for goal: \"{goal}\""),
    );
    vec![Effect::Generate { run, goal }]
}

fn apply_generated(state: &mut AppState, run: RunId, files: Vec<GeneratedFile>) -> Vec<Effect> {
    state.replace_files(files);
    let count = state.files().len();
    state.push_log(
        LogKind::Success,
        format!("Successfully generated {count} project files."),
    );

    let has_file = |suffix: &str| state.files().iter().any(|f| f.filename.ends_with(suffix));
    let has_package_json = has_file("package.json");
    let has_requirements = has_file("requirements.txt");
    if has_package_json {
        state.push_log(
            LogKind::Instruction,
            "Project contains a `package.json`. To install dependencies, run `npm install` in the project directory.",
        );
    }
    if has_requirements {
        state.push_log(
            LogKind::Instruction,
            "Project contains `requirements.txt`. To install dependencies, run `pip install -r requirements.txt`.",
        );
    }

    state.set_status(AgentStatus::Completed);

    if state.files().is_empty() {
        state.set_preview(None);
        Vec::new()
    } else {
        vec![Effect::BuildPreview {
            run,
            files: state.files().to_vec(),
        }]
    }
}

fn apply_preview(state: &mut AppState, outcome: PreviewOutcome) {
    match outcome {
        PreviewOutcome::Built { source, html } => {
            state.push_log(LogKind::Info, format!("Building preview from {source}..."));
            state.set_preview(Some(html));
            state.push_log(LogKind::Success, "Preview generated successfully.");
            state.select_tab(crate::PanelTab::Preview);
        }
        PreviewOutcome::NoHtml => {
            state.set_preview(None);
            state.push_log(LogKind::Info, "No HTML file found to generate a preview.");
        }
        PreviewOutcome::Failed { source, message } => {
            state.push_log(LogKind::Info, format!("Building preview from {source}..."));
            state.push_log(LogKind::Error, format!("Failed to build preview: {message}"));
            state.set_preview(None);
        }
    }
}
