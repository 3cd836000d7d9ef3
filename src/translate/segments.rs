use tracing::{info, warn};

use crate::config::LanguageConfig;
use crate::progress::{ProgressEvent, ProgressReporter, STAGE_TRANSLATE};
use crate::segment::{Segment, TranslatedSegment};
use super::Translator;

/// Outcome of translating one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentTranslation {
    Translated(String),
    Fallback { reason: String },
}

/// A segment whose translation failed and was replaced by the tagged original
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFailure {
    /// Position of the segment in the translated sequence (0-based)
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationReport {
    pub segments: Vec<TranslatedSegment>,
    pub failures: Vec<SegmentFailure>,
}

impl TranslationReport {
    pub fn translated_count(&self) -> usize {
        self.segments.iter().filter(|s| s.translated).count()
    }

    pub fn fallback_count(&self) -> usize {
        self.failures.len()
    }
}

/// Translates normalized segments one at a time, degrading to the tagged
/// original text whenever the translator fails
pub struct SegmentTranslator<'a> {
    translator: &'a dyn Translator,
    languages: &'a LanguageConfig,
    progress: Option<&'a dyn ProgressReporter>,
}

impl<'a> SegmentTranslator<'a> {
    pub fn new(translator: &'a dyn Translator, languages: &'a LanguageConfig) -> Self {
        Self {
            translator,
            languages,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Option<&'a dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Text used in place of a failed translation, e.g. `[TR] Merhaba`
    pub fn fallback_text(&self, original: &str) -> String {
        format!("[{}] {}", self.languages.fallback_tag(), original)
    }

    async fn translate_one(&self, segment: &Segment) -> SegmentTranslation {
        match self
            .translator
            .translate(&segment.text, &self.languages.source, &self.languages.target)
            .await
        {
            Ok(translation) if translation.trim().is_empty() => SegmentTranslation::Fallback {
                reason: "translator returned an empty text".to_string(),
            },
            Ok(translation) => SegmentTranslation::Translated(translation),
            Err(e) => SegmentTranslation::Fallback {
                reason: e.to_string(),
            },
        }
    }

    /// Translate every segment, in order. Never fails: each failure becomes a
    /// fallback entry and is listed in the report.
    pub async fn translate_all(&self, segments: &[Segment]) -> TranslationReport {
        let total = segments.len();
        info!(
            "Translating {} segments from {} to {}",
            total, self.languages.source, self.languages.target
        );

        let mut report = TranslationReport {
            segments: Vec::with_capacity(total),
            failures: Vec::new(),
        };

        for (idx, segment) in segments.iter().enumerate() {
            let translated = match self.translate_one(segment).await {
                SegmentTranslation::Translated(text) => TranslatedSegment {
                    start: segment.start,
                    end: segment.end,
                    text,
                    translated: true,
                },
                SegmentTranslation::Fallback { reason } => {
                    warn!(segment = idx, reason = %reason, "Translation failed, keeping original text");
                    report.failures.push(SegmentFailure { index: idx, reason });
                    TranslatedSegment {
                        start: segment.start,
                        end: segment.end,
                        text: self.fallback_text(&segment.text),
                        translated: false,
                    }
                }
            };
            report.segments.push(translated);

            if let Some(progress) = self.progress {
                progress.report(&ProgressEvent::fraction(STAGE_TRANSLATE, idx + 1, total));
            }
        }

        info!(
            "Translation finished: {} translated, {} kept in original language",
            report.translated_count(),
            report.fallback_count()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmanetError;
    use crate::progress::RecordingProgress;
    use crate::translate::MockTranslator;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 1.0, "Merhaba"),
            Segment::new(1.0, 2.0, "Nasılsın"),
            Segment::new(2.0, 3.0, "Görüşürüz"),
        ]
    }

    #[tokio::test]
    async fn test_all_segments_translated() {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .withf(|_, source, target| source.eq_ignore_ascii_case("tr") && target.eq_ignore_ascii_case("fr"))
            .times(3)
            .returning(|text, _, _| Ok(format!("fr:{}", text)));

        let languages = LanguageConfig::default();
        let report = SegmentTranslator::new(&translator, &languages)
            .translate_all(&segments())
            .await;

        assert_eq!(report.segments.len(), 3);
        assert!(report.failures.is_empty());
        assert_eq!(report.segments[1].text, "fr:Nasılsın");
        assert!(report.segments.iter().all(|s| s.translated));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_tagged_original() {
        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|text, _, _| {
            if text == "Nasılsın" {
                Err(EmanetError::Translation("model timeout".to_string()))
            } else {
                Ok(format!("fr:{}", text))
            }
        });

        let languages = LanguageConfig::default();
        let input = segments();
        let report = SegmentTranslator::new(&translator, &languages)
            .translate_all(&input)
            .await;

        assert_eq!(report.segments.len(), 3);
        assert_eq!(report.segments[0].text, "fr:Merhaba");
        assert!(report.segments[0].translated);
        assert_eq!(report.segments[1].text, "[TR] Nasılsın");
        assert!(!report.segments[1].translated);
        assert_eq!(report.segments[2].text, "fr:Görüşürüz");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(report.failures[0].reason.contains("model timeout"));

        for (out, src) in report.segments.iter().zip(&input) {
            assert_eq!((out.start, out.end), (src.start, src.end));
        }
    }

    #[tokio::test]
    async fn test_empty_translation_falls_back() {
        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|text, _, _| match text {
            "Merhaba" => Ok(String::new()),
            "Nasılsın" => Ok(" \n\n ".to_string()),
            _ => Ok("À plus".to_string()),
        });

        let languages = LanguageConfig::default();
        let report = SegmentTranslator::new(&translator, &languages)
            .translate_all(&segments())
            .await;

        assert_eq!(report.segments[0].text, "[TR] Merhaba");
        assert_eq!(report.segments[1].text, "[TR] Nasılsın");
        assert_eq!(report.segments[2].text, "À plus");
        let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_custom_fallback_tag() {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|_, _, _| Err(EmanetError::Translation("down".to_string())));

        let languages = LanguageConfig {
            fallback_tag: Some("TUR".to_string()),
            ..LanguageConfig::default()
        };
        let report = SegmentTranslator::new(&translator, &languages)
            .translate_all(&segments()[..1])
            .await;

        assert_eq!(report.segments[0].text, "[TUR] Merhaba");
        assert_eq!(report.translated_count(), 0);
        assert_eq!(report.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_progress_reported_after_each_segment() {
        let mut translator = MockTranslator::new();
        let mut calls = 0;
        translator.expect_translate().returning(move |text, _, _| {
            calls += 1;
            if calls == 2 {
                Err(EmanetError::Translation("bad input".to_string()))
            } else {
                Ok(text.to_uppercase())
            }
        });

        let languages = LanguageConfig::default();
        let recorder = RecordingProgress::new();
        let input = vec![
            Segment::new(0.0, 1.0, "a"),
            Segment::new(1.0, 2.0, "b"),
            Segment::new(2.0, 3.0, "c"),
            Segment::new(3.0, 4.0, "d"),
        ];
        SegmentTranslator::new(&translator, &languages)
            .with_progress(Some(&recorder))
            .translate_all(&input)
            .await;

        let events = recorder.events();
        let percents: Vec<f64> = events.iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![25.0, 50.0, 75.0, 100.0]);
        assert!(events.iter().all(|e| e.stage == STAGE_TRANSLATE));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let translator = MockTranslator::new();
        let languages = LanguageConfig::default();
        let recorder = RecordingProgress::new();
        let report = SegmentTranslator::new(&translator, &languages)
            .with_progress(Some(&recorder))
            .translate_all(&[])
            .await;

        assert!(report.segments.is_empty());
        assert!(recorder.events().is_empty());
    }
}
