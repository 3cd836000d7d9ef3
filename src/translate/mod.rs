// Translation
//
// - ollama: Translator backed by an Ollama `/api/generate` endpoint
// - segments: per-segment translation with tagged fallback on failure

pub mod ollama;
pub mod segments;

use async_trait::async_trait;

pub use ollama::{OllamaTranslator, check_ollama_availability};
pub use segments::{SegmentFailure, SegmentTranslation, SegmentTranslator, TranslationReport};
use crate::config::TranslateConfig;
use crate::error::Result;

/// Capability for translating a single piece of text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        Ok(Box::new(OllamaTranslator::new(config)?))
    }
}
