use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmanetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Failed to write subtitles to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("External command error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid video locator: {0}")]
    InvalidLocator(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl EmanetError {
    /// Name of the processing stage this error belongs to, for user reports
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) | Self::InvalidLocator(_) => "download",
            Self::Transcription(_) => "transcribe",
            Self::Translation(_) | Self::Http(_) => "translate",
            Self::Write { .. } => "write",
            Self::Playback(_) => "playback",
            Self::Config(_) | Self::Toml(_) => "config",
            Self::Io(_) | Self::Json(_) | Self::Media(_) | Self::FileNotFound(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, EmanetError>;
