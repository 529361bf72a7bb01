use std::sync::Once;

use pretty_assertions::assert_eq;
use scaffold_core::{
    update, AgentStatus, AppState, Effect, GeneratedFile, LogKind, Msg, PanelTab, PreviewOutcome,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scaffold_logging::initialize_for_tests);
}

fn fixed_clock() -> String {
    "12:00:00".to_string()
}

fn submit_goal(state: AppState, goal: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::GoalChanged(goal.to_string()));
    update(state, Msg::GenerateClicked)
}

fn sample_files() -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new("index.html", "<h1>hi</h1>"),
        GeneratedFile::new("style.css", "h1{color:red}"),
    ]
}

fn kinds(state: &AppState) -> Vec<LogKind> {
    state.logs().iter().map(|l| l.kind).collect()
}

fn messages(state: &AppState) -> Vec<String> {
    state.logs().iter().map(|l| l.message.clone()).collect()
}

#[test]
fn empty_goal_is_rejected_without_effects() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);

    let (state, effects) = submit_goal(state, "   \n\t ");

    assert!(effects.is_empty());
    assert_eq!(state.status(), AgentStatus::Idle);
    assert_eq!(state.error(), Some("Please enter a goal."));
    assert!(state.logs().is_empty());
}

#[test]
fn editing_goal_clears_error() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = update(state, Msg::GenerateClicked);
    assert!(state.error().is_some());

    let (state, _) = update(state, Msg::GoalChanged("a todo app".into()));
    assert_eq!(state.error(), None);
    assert_eq!(state.goal(), "a todo app");
}

#[test]
fn submit_enters_generating_and_requests_generation() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);

    let (mut state, effects) = submit_goal(state, "a todo app");

    assert_eq!(state.status(), AgentStatus::Generating);
    assert_eq!(
        effects,
        vec![Effect::Generate {
            run: 1,
            goal: "a todo app".to_string()
        }]
    );
    assert_eq!(
        messages(&state),
        vec!["Generating project for goal: \"a todo app\"".to_string()]
    );
    assert_eq!(state.logs()[0].timestamp, "12:00:00");
    assert!(state.consume_dirty());

    let view = state.view();
    assert!(!view.input_enabled);
    assert!(!view.can_generate);
}

#[test]
fn submit_is_ignored_while_generating() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "first");

    let (state, effects) = update(state, Msg::GenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(state.run(), 1);

    let (state, _) = update(state, Msg::GoalChanged("second".into()));
    assert_eq!(state.goal(), "first");
}

#[test]
fn successful_generation_completes_and_requests_preview() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");

    let (state, effects) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    assert_eq!(state.status(), AgentStatus::Completed);
    assert_eq!(state.files().len(), 2);
    assert_ne!(state.files()[0].id, state.files()[1].id);
    assert_eq!(
        messages(&state)[1],
        "Successfully generated 2 project files."
    );
    match effects.as_slice() {
        [Effect::BuildPreview { run, files }] => {
            assert_eq!(*run, 1);
            assert_eq!(files, state.files());
        }
        other => panic!("unexpected effects {other:?}"),
    }
    assert!(state.view().can_download);
}

#[test]
fn dependency_manifests_add_instructions() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "full stack");

    let files = vec![
        GeneratedFile::new("web/package.json", "{}"),
        GeneratedFile::new("api/requirements.txt", "flask"),
    ];
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(files),
        },
    );

    assert_eq!(
        kinds(&state),
        vec![
            LogKind::Info,
            LogKind::Success,
            LogKind::Instruction,
            LogKind::Instruction
        ]
    );
    assert!(messages(&state)[2].contains("npm install"));
    assert!(messages(&state)[3].contains("pip install -r requirements.txt"));
}

#[test]
fn failed_generation_keeps_files_and_logs_and_sets_error() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let before_logs = state.logs().to_vec();
    let before_files = state.files().to_vec();

    let (state, effects) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Err("service unavailable".into()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), AgentStatus::Error);
    assert_eq!(state.error(), Some("service unavailable"));
    assert_eq!(state.files(), before_files.as_slice());
    assert_eq!(&state.logs()[..before_logs.len()], before_logs.as_slice());
    assert_eq!(state.logs().len(), before_logs.len() + 1);
    let last = state.logs().last().unwrap();
    assert_eq!(last.kind, LogKind::Error);
    assert_eq!(last.message, "service unavailable");
}

#[test]
fn resubmit_after_completion_discards_previous_run() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    let (state, effects) = update(state, Msg::GenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::Generate {
            run: 2,
            goal: "a page".into()
        }]
    );
    assert!(state.files().is_empty());
    assert_eq!(state.logs().len(), 1);
    assert_eq!(state.preview(), None);
    assert_eq!(state.goal(), "a page");
}

#[test]
fn built_preview_is_logged_and_selected() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            run: 1,
            outcome: PreviewOutcome::Built {
                source: "index.html".into(),
                html: "<html></html>".into(),
            },
        },
    );

    assert_eq!(state.preview(), Some("<html></html>"));
    assert_eq!(state.active_tab(), PanelTab::Preview);
    let tail: Vec<String> = messages(&state).into_iter().skip(2).collect();
    assert_eq!(
        tail,
        vec![
            "Building preview from index.html...".to_string(),
            "Preview generated successfully.".to_string()
        ]
    );
}

#[test]
fn missing_html_logs_info_and_has_no_preview() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a script");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(vec![GeneratedFile::new("main.py", "print(1)")]),
        },
    );

    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            run: 1,
            outcome: PreviewOutcome::NoHtml,
        },
    );

    assert_eq!(state.preview(), None);
    let last = state.logs().last().unwrap();
    assert_eq!(last.kind, LogKind::Info);
    assert_eq!(last.message, "No HTML file found to generate a preview.");

    let (state, _) = update(state, Msg::TabSelected(PanelTab::Preview));
    assert_eq!(state.active_tab(), PanelTab::Logs);
}

#[test]
fn preview_failure_is_not_fatal() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            run: 1,
            outcome: PreviewOutcome::Failed {
                source: "index.html".into(),
                message: "boom".into(),
            },
        },
    );

    assert_eq!(state.status(), AgentStatus::Completed);
    assert_eq!(state.preview(), None);
    assert_eq!(state.error(), None);
    assert_eq!(
        state.logs().last().unwrap().message,
        "Failed to build preview: boom"
    );
}

#[test]
fn clear_resets_everything() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    let (state, effects) = update(state, Msg::ClearClicked);

    assert!(effects.is_empty());
    assert_eq!(state.status(), AgentStatus::Idle);
    assert!(state.files().is_empty());
    assert!(state.logs().is_empty());
    assert_eq!(state.goal(), "");
    assert_eq!(state.error(), None);
    assert_eq!(state.preview(), None);
    assert_eq!(state.active_tab(), PanelTab::Logs);
}

#[test]
fn results_from_a_cleared_run_are_dropped() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(state, Msg::ClearClicked);

    let (state, effects) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );

    assert!(effects.is_empty());
    assert!(state.files().is_empty());
    assert_eq!(state.status(), AgentStatus::Idle);
}

#[test]
fn file_rows_expand_and_collapse() {
    init_logging();
    let state = AppState::with_clock(fixed_clock);
    let (state, _) = submit_goal(state, "a page");
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            run: 1,
            result: Ok(sample_files()),
        },
    );
    let file_id = state.files()[1].id;

    let (state, _) = update(state, Msg::FileToggled { file_id });
    let view = state.view();
    assert_eq!(view.files[0].content, None);
    assert_eq!(view.files[1].content.as_deref(), Some("h1{color:red}"));

    let (state, _) = update(state, Msg::FileToggled { file_id });
    assert_eq!(state.view().files[1].content, None);
}
