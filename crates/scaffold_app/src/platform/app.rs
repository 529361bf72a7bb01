use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use scaffold_core::{update, AgentStatus, AppState, Msg};
use scaffold_logging::scaffold_info;

use super::cli::Cli;
use super::effects::{EffectRunner, PREVIEW_FILENAME};
use super::logging;
use super::ui::input::{parse_line, UiCommand, HELP};
use super::ui::render::{render_files, Renderer};

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_to, cli.log_level);

    let config = cli.engine_config();
    scaffold_info!(
        "starting scaffolder output_dir={:?} settings={:?}",
        config.output_dir,
        config.generation
    );
    let runner = EffectRunner::new(config).context("failed to start the engine")?;
    let mut app = App::new(runner);

    match cli.goal {
        Some(goal) => app.run_once(goal, cli.download),
        None => app.run_interactive(),
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        let renderer = Renderer::new(runner.output_dir().join(PREVIEW_FILENAME));
        Self {
            state: AppState::new(),
            runner,
            renderer,
        }
    }

    /// Generates a single goal, optionally downloads it, and reports failure as an error.
    fn run_once(&mut self, goal: String, download: bool) -> anyhow::Result<()> {
        self.dispatch(Msg::GoalChanged(goal));
        self.dispatch(Msg::GenerateClicked);
        if self.state.status() != AgentStatus::Generating {
            bail!(self.state.error().unwrap_or("generation did not start").to_string());
        }
        self.settle();

        if download && self.state.status() == AgentStatus::Completed {
            self.dispatch(Msg::DownloadClicked);
            self.settle();
        }

        match (self.state.status(), self.state.error()) {
            (AgentStatus::Error, Some(message)) => bail!(message.to_string()),
            (_, Some(message)) if download => bail!(message.to_string()),
            _ => Ok(()),
        }
    }

    fn run_interactive(&mut self) -> anyhow::Result<()> {
        self.print([
            "Scaffolder: describe the project you want to build.".to_string(),
            HELP.to_string(),
        ]);
        let input = spawn_input_reader();
        let mut closing = false;

        loop {
            match input.recv_timeout(TICK) {
                Ok(line) => {
                    if !self.handle_command(parse_line(&line)) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => closing = true,
            }
            self.pump();
            if closing && self.runner.pending() == 0 {
                break;
            }
        }
        scaffold_info!("interactive session finished");
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn handle_command(&mut self, command: UiCommand) -> bool {
        match command {
            UiCommand::Dispatch(msgs) => {
                for msg in msgs {
                    if msg == Msg::GenerateClicked
                        && self.state.status() == AgentStatus::Generating
                    {
                        self.print(["busy: a generation is already running".to_string()]);
                        continue;
                    }
                    self.dispatch(msg);
                }
            }
            UiCommand::ToggleFile(index) => match self.state.files().get(index - 1) {
                Some(file) => {
                    let file_id = file.id;
                    self.dispatch(Msg::FileToggled { file_id });
                }
                None => self.print([format!("no file number {index}")]),
            },
            UiCommand::ShowFiles => {
                let lines = render_files(&self.state.view());
                self.print(lines);
            }
            UiCommand::Help => self.print([HELP.to_string()]),
            UiCommand::Unknown(message) => self.print([message]),
            UiCommand::Quit => return false,
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);

        if let Some(view) = view {
            let lines = self.renderer.render(&view);
            self.print(lines);
        }
    }

    fn pump(&mut self) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }
    }

    /// Blocks until every outstanding effect has reported back.
    fn settle(&mut self) {
        loop {
            self.pump();
            if self.runner.pending() == 0 {
                return;
            }
            thread::sleep(TICK);
        }
    }

    fn print(&self, lines: impl IntoIterator<Item = String>) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

/// Reads stdin on its own thread; the channel closes at end of input.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
