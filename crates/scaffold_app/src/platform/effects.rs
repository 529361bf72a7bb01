use std::path::{Path, PathBuf};

use scaffold_core::{Effect, GeneratedFile, Msg, PreviewOutcome, ProjectFile};
use scaffold_engine::{AtomicFileWriter, EngineConfig, EngineError, EngineEvent, EngineHandle};
use scaffold_logging::{scaffold_debug, scaffold_info, scaffold_warn};

/// The preview pane: assembled HTML lands here so a browser can open it.
pub const PREVIEW_FILENAME: &str = "preview.html";

pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
    pending: usize,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let output_dir = config.output_dir.clone();
        let engine = EngineHandle::new(config)?;
        Ok(Self {
            engine,
            output_dir,
            pending: 0,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of effects still waiting for an engine answer.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate { run, goal } => {
                    scaffold_info!("Generate run={} goal_len={}", run, goal.len());
                    self.engine.generate(run, goal);
                }
                Effect::BuildPreview { run, files } => {
                    scaffold_info!("BuildPreview run={} files={}", run, files.len());
                    self.engine.build_preview(run, to_engine_files(files));
                }
                Effect::ExportArchive { files } => {
                    scaffold_info!("ExportArchive files={}", files.len());
                    self.engine.export(to_engine_files(files));
                }
            }
            self.pending += 1;
        }
    }

    /// Drains finished engine work into messages for the state machine.
    pub fn poll(&mut self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            inbox.push(self.map_event(event));
        }
        inbox
    }

    fn map_event(&self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::GenerationCompleted { run, result } => Msg::GenerationFinished {
                run,
                result: result
                    .map(|files| {
                        files
                            .into_iter()
                            .map(|f| GeneratedFile::new(f.filename, f.content))
                            .collect()
                    })
                    .map_err(|err| err.to_string()),
            },
            EngineEvent::PreviewCompleted { run, result } => {
                let outcome = match result {
                    Ok(Some(preview)) => {
                        self.save_preview(&preview.html);
                        PreviewOutcome::Built {
                            source: preview.source,
                            html: preview.html,
                        }
                    }
                    Ok(None) => PreviewOutcome::NoHtml,
                    Err(err) => PreviewOutcome::Failed {
                        message: err.to_string(),
                        source: err.entry,
                    },
                };
                Msg::PreviewFinished { run, outcome }
            }
            EngineEvent::ExportCompleted { result } => match result {
                Ok(Some(summary)) => {
                    scaffold_info!(
                        "archive written path={:?} entries={} bytes={}",
                        summary.path,
                        summary.entry_count,
                        summary.byte_len
                    );
                    Msg::ExportFinished {
                        result: Ok(summary.path.display().to_string()),
                    }
                }
                Ok(None) => {
                    scaffold_debug!("export skipped: no files");
                    Msg::NoOp
                }
                Err(err) => {
                    scaffold_warn!("export failed: {}", err);
                    Msg::ExportFinished {
                        result: Err(err.to_string()),
                    }
                }
            },
        }
    }

    fn save_preview(&self, html: &str) {
        let writer = AtomicFileWriter::new(self.output_dir.clone());
        match writer.write(PREVIEW_FILENAME, html) {
            Ok(path) => scaffold_info!("preview written to {:?}", path),
            Err(err) => scaffold_warn!("failed to write preview: {}", err),
        }
    }
}

fn to_engine_files(files: Vec<ProjectFile>) -> Vec<scaffold_engine::GeneratedFile> {
    files
        .into_iter()
        .map(|f| scaffold_engine::GeneratedFile::new(f.filename, f.content))
        .collect()
}
