use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, EmanetError};
use crate::media::ToolCommand;
use crate::segment::Segment;
use super::SpeechRecognizer;

/// JSON document written by `whisper --output_format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    #[serde(default)]
    pub text: String,
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<WhisperOutput> for Vec<Segment> {
    fn from(output: WhisperOutput) -> Self {
        output
            .segments
            .into_iter()
            .map(|seg| Segment::new(seg.start, seg.end, seg.text.trim()))
            .collect()
    }
}

/// Speech recognizer driving the whisper command line tool
pub struct WhisperRecognizer {
    config: TranscriberConfig,
}

impl WhisperRecognizer {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    pub fn command(&self, audio_path: &Path, language_hint: &str, output_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Transcription")
            .path(audio_path)
            .option("--model", &self.config.model)
            .option("--language", language_hint)
            .option("--task", "transcribe")
            .option_if("--device", self.config.device.as_deref())
            .option("--output_format", "json")
            .option("--verbose", "False")
            .option("--output_dir", output_dir.to_string_lossy().to_string())
    }
}

/// Parse whisper's JSON output into raw segments
pub fn parse_whisper_json(content: &str) -> Result<Vec<Segment>> {
    let output: WhisperOutput = serde_json::from_str(content)
        .map_err(|e| EmanetError::Transcription(format!("Failed to parse whisper JSON: {}", e)))?;
    Ok(output.into())
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn transcribe(&self, audio_path: &Path, language_hint: &str) -> Result<Vec<Segment>> {
        info!("Transcribing {} (model {}, language {})",
              audio_path.display(), self.config.model, language_hint);

        if !audio_path.exists() {
            return Err(EmanetError::Transcription(format!(
                "Audio file not found: {}", audio_path.display()
            )));
        }

        let temp_dir = tempfile::tempdir()
            .map_err(|e| EmanetError::Transcription(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let output = self.command(audio_path, language_hint, output_dir)
            .execute()
            .await
            .map_err(|e| EmanetError::Transcription(e.to_string()))?;
        if !output.stderr.trim().is_empty() {
            debug!("whisper stderr: {}", output.stderr.trim());
        }

        let audio_stem = audio_path.file_stem()
            .ok_or_else(|| EmanetError::Transcription("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| EmanetError::Transcription(format!("Failed to read whisper output: {}", e)))?;

        let segments = parse_whisper_json(&json_content)?;
        info!("Transcription finished: {} segments", segments.len());
        Ok(segments)
    }
}
