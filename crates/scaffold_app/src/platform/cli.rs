use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use scaffold_engine::{EngineConfig, GenerationSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

use super::logging::LogDestination;

/// Describe the application you want and get back a complete, downloadable project.
#[derive(Debug, Parser)]
#[command(name = "scaffolder", version)]
pub struct Cli {
    /// Generate this goal right away and exit; without it an interactive session starts.
    #[arg(short, long)]
    pub goal: Option<String>,

    /// After a one-shot generation, also write the zip archive.
    #[arg(long, requires = "goal")]
    pub download: bool,

    /// Model service credential. Falls back to the API_KEY environment variable.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory receiving the archive and the preview page.
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log_to: LogDestination,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level `{raw}` (use off, error, warn, info, debug or trace)"))
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        self.engine_config_with_fallback(std::env::var("API_KEY").ok())
    }

    fn engine_config_with_fallback(&self, fallback_key: Option<String>) -> EngineConfig {
        let mut config = EngineConfig::default_with_output(self.output_dir.clone());
        config.generation = GenerationSettings {
            api_key: self.api_key.clone().or(fallback_key),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            ..config.generation
        };
        config
    }
}
