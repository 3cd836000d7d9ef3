use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::config::PlaybackConfig;
use crate::error::{Result, EmanetError};
use super::ToolCommand;

/// Capability for opening a video with a subtitle overlay
#[async_trait]
pub trait PlaybackLauncher: Send + Sync {
    async fn launch(&self, locator: &str, subtitle_path: &Path) -> Result<()>;
}

/// Launches VLC on the original video URL with the generated subtitles
pub struct VlcLauncher {
    config: PlaybackConfig,
}

impl VlcLauncher {
    pub fn new(config: PlaybackConfig) -> Self {
        Self { config }
    }

    pub fn command(&self, locator: &str, subtitle_path: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Playback")
            .arg(locator)
            .arg(format!("--sub-file={}", subtitle_path.display()))
            .arg("--sub-track=0")
    }
}

#[async_trait]
impl PlaybackLauncher for VlcLauncher {
    async fn launch(&self, locator: &str, subtitle_path: &Path) -> Result<()> {
        if !subtitle_path.exists() {
            return Err(EmanetError::FileNotFound(subtitle_path.display().to_string()));
        }

        let pid = self
            .command(locator, subtitle_path)
            .spawn_detached()
            .map_err(|e| EmanetError::Playback(e.to_string()))?;

        info!("Started {} (pid {}) with subtitles {}", self.config.binary_path, pid, subtitle_path.display());
        Ok(())
    }
}
