// Speech recognition
//
// - whisper: runs the whisper CLI and parses its JSON output

pub mod whisper;

use async_trait::async_trait;
use std::path::Path;

pub use whisper::WhisperRecognizer;
use crate::config::TranscriberConfig;
use crate::error::Result;
use crate::segment::Segment;

/// Capability for turning an audio file into time-stamped text segments
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe `audio_path`; segments come back in chronological order
    async fn transcribe(&self, audio_path: &Path, language_hint: &str) -> Result<Vec<Segment>>;
}

/// Factory for creating recognizer instances
pub struct RecognizerFactory;

impl RecognizerFactory {
    pub fn create_recognizer(config: TranscriberConfig) -> Box<dyn SpeechRecognizer> {
        Box::new(WhisperRecognizer::new(config))
    }
}
