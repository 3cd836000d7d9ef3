// Media fetching
//
// - yt_dlp: downloads the audio track of a video with yt-dlp

pub mod yt_dlp;

use async_trait::async_trait;
use std::path::PathBuf;

pub use yt_dlp::YtDlpFetcher;
use crate::config::{FetcherConfig, OutputConfig};
use crate::error::{Result, EmanetError};

/// Local audio produced for one video
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMedia {
    pub audio_path: PathBuf,
    pub title: String,
}

/// Capability for turning a video locator into a local audio file
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<FetchedMedia>;
}

/// Factory for creating fetcher instances
pub struct FetcherFactory;

impl FetcherFactory {
    pub fn create_fetcher(config: FetcherConfig, output: &OutputConfig) -> Box<dyn MediaFetcher> {
        Box::new(YtDlpFetcher::new(config, output.temp_dir.clone()))
    }
}

/// Reject anything that is not a YouTube video URL
pub fn validate_locator(locator: &str) -> Result<()> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(EmanetError::InvalidLocator("empty locator".to_string()));
    }
    if !locator.contains("youtube.com") && !locator.contains("youtu.be") {
        return Err(EmanetError::InvalidLocator(format!(
            "{} is not a YouTube video URL",
            locator
        )));
    }
    Ok(())
}

/// Make a video title usable as a file name: keeps alphanumerics, spaces,
/// `-` and `_`, and strips trailing whitespace
pub fn sanitize_title(title: &str) -> String {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim_end();

    if safe.trim().is_empty() {
        "subtitles".to_string()
    } else {
        safe.to_string()
    }
}
