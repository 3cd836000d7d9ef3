use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, EmanetError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub languages: LanguageConfig,
    pub subtitles: SubtitleConfig,
    pub fetcher: FetcherConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub playback: PlaybackConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Spoken language of the videos, also passed to the recognizer as a hint
    pub source: String,
    /// Language the subtitles are translated into
    pub target: String,
    /// Tag prefixed to untranslated fallback entries (defaults to the upper-cased source)
    pub fallback_tag: Option<String>,
}

impl LanguageConfig {
    pub fn fallback_tag(&self) -> String {
        self.fallback_tag
            .clone()
            .unwrap_or_else(|| self.source.to_uppercase())
    }

    /// Suffix used in subtitle file names, e.g. `FR`
    pub fn target_suffix(&self) -> String {
        self.target.to_uppercase()
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: "tr".to_string(),
            target: "fr".to_string(),
            fallback_tag: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Shortest time a subtitle stays on screen (seconds)
    pub min_duration: f64,
    /// Longest time a subtitle stays on screen (seconds)
    pub max_duration: f64,
    /// Maximum characters per rendered line when wrapping is enabled
    pub max_line_length: usize,
    /// Preferred maximum number of lines per entry. Not enforced.
    pub max_lines: usize,
    /// Wrap subtitle text to `max_line_length`
    pub wrap_lines: bool,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            min_duration: 0.5,
            max_duration: 7.0,
            max_line_length: 42,
            max_lines: 2,
            wrap_lines: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Path to the yt-dlp binary
    pub binary_path: String,
    /// Audio container produced by the post-processor
    pub audio_format: String,
    /// Audio quality handed to the post-processor
    pub audio_quality: String,
    /// Reject locators that are not YouTube URLs
    pub require_youtube: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            audio_format: "wav".to_string(),
            audio_quality: "192".to_string(),
            require_youtube: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,
    /// Whisper model size (tiny, base, small, medium, large)
    pub model: String,
    /// Device override ("cuda" or "cpu"); whisper picks one when unset
    pub device: Option<String>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "whisper".to_string(),
            model: "base".to_string(),
            device: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
    /// Timeout of a single translation request (seconds)
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Path to the vlc binary
    pub binary_path: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            binary_path: "vlc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the generated subtitle files
    pub dir: PathBuf,
    /// Scratch directory for downloaded audio
    pub temp_dir: PathBuf,
    /// Keep downloaded audio after a run
    pub keep_temp_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("emanet_subtitles"),
            temp_dir: PathBuf::from("temp"),
            keep_temp_files: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause between two episodes of a batch (seconds)
    pub pause_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { pause_secs: 10 }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EmanetError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| EmanetError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EmanetError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| EmanetError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let subs = &self.subtitles;
        if !subs.min_duration.is_finite() || subs.min_duration <= 0.0 {
            return Err(EmanetError::Config(format!(
                "subtitles.min_duration must be positive, got {}",
                subs.min_duration
            )));
        }
        if subs.max_duration.is_nan() || subs.max_duration < subs.min_duration {
            return Err(EmanetError::Config(format!(
                "subtitles.max_duration ({}) must not be below min_duration ({})",
                subs.max_duration, subs.min_duration
            )));
        }
        if subs.max_line_length == 0 || subs.max_lines == 0 {
            return Err(EmanetError::Config(
                "subtitles.max_line_length and max_lines must be at least 1".to_string(),
            ));
        }
        if self.languages.source.trim().is_empty() || self.languages.target.trim().is_empty() {
            return Err(EmanetError::Config("Language tags must not be empty".to_string()));
        }
        Ok(())
    }
}
