use std::path::Path;
use tokio::fs as async_fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::media::ToolCommand;
use crate::translate::check_ollama_availability;

/// Result of one installation check
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    pub detail: String,
}

impl ToolStatus {
    fn new<S1: Into<String>, S2: Into<String>>(name: S1, available: bool, detail: S2) -> Self {
        Self {
            name: name.into(),
            available,
            detail: detail.into(),
        }
    }
}

pub struct SetupManager<'a> {
    config: &'a Config,
}

impl<'a> SetupManager<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// External programs the workflow shells out to, with the argument used to probe them
    pub fn tool_probes(&self) -> Vec<ToolCommand> {
        vec![
            ToolCommand::new(&self.config.fetcher.binary_path, "yt-dlp").arg("--version"),
            ToolCommand::new(&self.config.transcriber.binary_path, "whisper").arg("--help"),
            ToolCommand::new("ffmpeg", "ffmpeg").arg("-version"),
            ToolCommand::new(&self.config.playback.binary_path, "vlc").arg("--version"),
        ]
    }

    /// Create the output and scratch directories when missing
    pub async fn ensure_directories(&self) -> Result<Vec<ToolStatus>> {
        let mut statuses = Vec::new();

        for dir in [&self.config.output.dir, &self.config.output.temp_dir] {
            statuses.push(self.ensure_directory(dir).await?);
        }

        Ok(statuses)
    }

    async fn ensure_directory(&self, dir: &Path) -> Result<ToolStatus> {
        if dir.is_dir() {
            return Ok(ToolStatus::new(dir.display().to_string(), true, "exists"));
        }

        async_fs::create_dir_all(dir).await?;
        info!("Created directory {}", dir.display());
        Ok(ToolStatus::new(dir.display().to_string(), true, "created"))
    }

    /// Probe every external dependency and report what is usable
    pub async fn check_installation(&self) -> Result<Vec<ToolStatus>> {
        info!("Checking installation...");
        let mut statuses = Vec::new();

        for probe in self.tool_probes() {
            let available = probe.probe().await;
            if !available {
                warn!("{} is not available ({})", probe.description, probe.binary_path);
            }
            let detail = if available { "available" } else { "not found" };
            statuses.push(ToolStatus::new(probe.description.clone(), available, detail));
        }

        let translate = &self.config.translate;
        let ollama = match check_ollama_availability(&translate.endpoint, &translate.model).await {
            Ok(()) => ToolStatus::new("ollama", true, format!("model {} ready", translate.model)),
            Err(e) => {
                warn!("Ollama check failed: {}", e);
                ToolStatus::new("ollama", false, e.to_string())
            }
        };
        statuses.push(ollama);

        statuses.extend(self.ensure_directories().await?);
        Ok(statuses)
    }
}
