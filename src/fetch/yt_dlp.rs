use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::FetcherConfig;
use crate::error::{Result, EmanetError};
use crate::media::ToolCommand;
use super::{FetchedMedia, MediaFetcher};

/// Downloads the best audio stream with yt-dlp and converts it locally
pub struct YtDlpFetcher {
    config: FetcherConfig,
    temp_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(config: FetcherConfig, temp_dir: PathBuf) -> Self {
        Self { config, temp_dir }
    }

    pub fn command(&self, locator: &str, run_dir: &Path) -> ToolCommand {
        let template = run_dir.join("%(title)s.%(ext)s");

        ToolCommand::new(&self.config.binary_path, "Audio download")
            .option("--format", "bestaudio/best")
            .arg("--extract-audio")
            .option("--audio-format", &self.config.audio_format)
            .option("--audio-quality", &self.config.audio_quality)
            .option("--output", template.to_string_lossy().to_string())
            .arg("--no-simulate")
            .arg("--no-warnings")
            .option("--print", "title")
            .option("--print", "after_move:filepath")
            .arg(locator)
    }

    /// Look for the converted audio file when yt-dlp did not report it
    fn find_audio_file(&self, run_dir: &Path) -> Option<PathBuf> {
        WalkDir::new(run_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .find(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.audio_format))
            })
    }
}

/// Split yt-dlp's `--print` output into (title, reported file path)
pub fn parse_print_output(stdout: &str) -> (Option<String>, Option<PathBuf>) {
    let lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let title = lines.first().map(|line| line.to_string());
    let path = if lines.len() > 1 {
        lines.last().map(PathBuf::from)
    } else {
        None
    };

    (title, path)
}

impl YtDlpFetcher {
    async fn download(&self, locator: &str, run_dir: &Path) -> Result<FetchedMedia> {
        let output = self
            .command(locator, run_dir)
            .execute()
            .await
            .map_err(|e| EmanetError::Fetch(e.to_string()))?;
        debug!("yt-dlp output: {}", output.stdout.trim());
        if !output.stderr.trim().is_empty() {
            debug!("yt-dlp stderr: {}", output.stderr.trim());
        }

        let (title, reported_path) = parse_print_output(&output.stdout);

        let audio_path = match reported_path.filter(|path| path.exists()) {
            Some(path) => path,
            None => {
                warn!("yt-dlp did not report an audio file, searching {}", run_dir.display());
                self.find_audio_file(run_dir).ok_or_else(|| {
                    EmanetError::Fetch(format!(
                        "No .{} file produced for {}",
                        self.config.audio_format, locator
                    ))
                })?
            }
        };

        let title = title.unwrap_or_else(|| {
            audio_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        Ok(FetchedMedia { audio_path, title })
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedMedia> {
        info!("Downloading: {}", locator);

        let run_dir = self.temp_dir.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&run_dir).await.map_err(|e| {
            EmanetError::Fetch(format!("Failed to create {}: {}", run_dir.display(), e))
        })?;

        match self.download(locator, &run_dir).await {
            Ok(media) => {
                info!("Audio extracted: {}", media.audio_path.display());
                Ok(media)
            }
            Err(e) => {
                // Partial downloads go with the run directory
                if let Err(cleanup) = tokio::fs::remove_dir_all(&run_dir).await {
                    warn!("Failed to remove {}: {}", run_dir.display(), cleanup);
                }
                Err(e)
            }
        }
    }
}
