use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scaffold_logging::{scaffold_info, scaffold_warn};

use crate::archive::{export_archive, ArchiveError};
use crate::generate::{GeminiGenerator, GenerateError, ProjectGenerator};
use crate::preview::{build_preview, entry_point, PreviewError, PreviewFailure};
use crate::{EngineConfig, EngineEvent, GeneratedFile, RunId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Spawn(std::io::Error),
}

enum EngineCommand {
    Generate { run: RunId, goal: String },
    BuildPreview { run: RunId, files: Vec<GeneratedFile> },
    Export { files: Vec<GeneratedFile> },
}

/// Front door to the background worker.
///
/// Commands are queued to a dedicated thread that owns a tokio runtime; results
/// come back as [`EngineEvent`]s which the UI thread polls.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let generator = Arc::new(GeminiGenerator::new(config.generation));
        Self::with_generator(generator, config.output_dir)
    }

    /// Starts the worker with a caller-supplied generator.
    pub fn with_generator(
        generator: Arc<dyn ProjectGenerator>,
        output_dir: PathBuf,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let output_dir = Arc::new(output_dir);

        thread::Builder::new()
            .name("scaffold-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let generator = generator.clone();
                    let output_dir = output_dir.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(generator, &output_dir, command, event_tx).await;
                    });
                }
                scaffold_info!("engine command channel closed; worker exiting");
            })
            .map_err(EngineError::Spawn)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn generate(&self, run: RunId, goal: impl Into<String>) {
        self.send(EngineCommand::Generate {
            run,
            goal: goal.into(),
        });
    }

    pub fn build_preview(&self, run: RunId, files: Vec<GeneratedFile>) {
        self.send(EngineCommand::BuildPreview { run, files });
    }

    pub fn export(&self, files: Vec<GeneratedFile>) {
        self.send(EngineCommand::Export { files });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scaffold_warn!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    generator: Arc<dyn ProjectGenerator>,
    output_dir: &std::path::Path,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Generate { run, goal } => {
            let result = tokio::spawn(async move { generator.generate(&goal).await })
                .await
                .unwrap_or_else(|err| {
                    Err(GenerateError::Service(format!("generation task aborted: {err}")))
                });
            if let Err(err) = &result {
                scaffold_warn!("run {} generation failed: {}", run, err);
            }
            EngineEvent::GenerationCompleted { run, result }
        }
        EngineCommand::BuildPreview { run, files } => {
            let entry = entry_point(&files)
                .map(|f| f.filename.clone())
                .unwrap_or_default();
            let result = tokio::task::spawn_blocking(move || build_preview(&files))
                .await
                .unwrap_or_else(|err| {
                    Err(PreviewError {
                        entry,
                        kind: PreviewFailure::Aborted(err.to_string()),
                    })
                });
            if let Err(err) = &result {
                scaffold_warn!("run {} preview of {} failed: {}", run, err.entry, err);
            }
            EngineEvent::PreviewCompleted { run, result }
        }
        EngineCommand::Export { files } => {
            let dir = output_dir.to_path_buf();
            let result = tokio::task::spawn_blocking(move || export_archive(&files, &dir))
                .await
                .unwrap_or_else(|err| {
                    Err(ArchiveError::Io(std::io::Error::other(err.to_string())))
                });
            EngineEvent::ExportCompleted { result }
        }
    };
    let _ = event_tx.send(event);
}
