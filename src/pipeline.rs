//! Segment-to-subtitle pipeline: normalize, translate, then format and write.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Config, LanguageConfig};
use crate::error::Result;
use crate::normalize::{normalize_segments, TimingPolicy};
use crate::progress::{ProgressEvent, ProgressReporter, STAGE_WRITE};
use crate::segment::Segment;
use crate::subtitle::{write_srt, Layout};
use crate::translate::{SegmentFailure, SegmentTranslator, Translator};

/// What a pipeline run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub subtitle_path: PathBuf,
    /// Number of subtitle entries written
    pub entries: usize,
    /// Entries carrying a translation
    pub translated: usize,
    /// Entries kept in the source language
    pub fallbacks: Vec<SegmentFailure>,
    /// Raw segments discarded by normalization
    pub dropped: usize,
}

/// Everything a run needs, passed in explicitly
pub struct SubtitlePipeline<'a> {
    translator: &'a dyn Translator,
    languages: &'a LanguageConfig,
    timing: TimingPolicy,
    layout: Layout,
    progress: Option<&'a dyn ProgressReporter>,
}

impl<'a> SubtitlePipeline<'a> {
    pub fn new(
        translator: &'a dyn Translator,
        languages: &'a LanguageConfig,
        timing: TimingPolicy,
        layout: Layout,
    ) -> Self {
        Self {
            translator,
            languages,
            timing,
            layout,
            progress: None,
        }
    }

    /// Pipeline configured from the `languages` and `subtitles` sections
    pub fn from_config(translator: &'a dyn Translator, config: &'a Config) -> Self {
        Self::new(
            translator,
            &config.languages,
            TimingPolicy::from(&config.subtitles),
            Layout::from(&config.subtitles),
        )
    }

    pub fn with_progress(mut self, progress: Option<&'a dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Turn raw recognizer segments into a subtitle file at `output_path`
    pub async fn run(&self, raw: &[Segment], output_path: &Path) -> Result<PipelineReport> {
        let normalized = normalize_segments(raw, &self.timing);
        let dropped = raw.len() - normalized.len();
        info!(
            "Normalized {} raw segments into {} ({} dropped)",
            raw.len(),
            normalized.len(),
            dropped
        );

        let report = SegmentTranslator::new(self.translator, self.languages)
            .with_progress(self.progress)
            .translate_all(&normalized)
            .await;

        if let Some(progress) = self.progress {
            progress.report(&ProgressEvent::new(STAGE_WRITE, 100.0));
        }
        write_srt(&report.segments, output_path, &self.layout).await?;

        Ok(PipelineReport {
            subtitle_path: output_path.to_path_buf(),
            entries: report.segments.len(),
            translated: report.translated_count(),
            fallbacks: report.failures,
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmanetError;
    use crate::progress::{RecordingProgress, STAGE_TRANSLATE};
    use crate::translate::MockTranslator;

    fn echo_translator(reply: &'static str) -> MockTranslator {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(move |_, _, _| Ok(reply.to_string()));
        translator
    }

    #[tokio::test]
    async fn test_single_segment_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let translator = echo_translator("Bonjour");
        let config = Config::default();

        let report = SubtitlePipeline::from_config(&translator, &config)
            .run(&[Segment::new(0.0, 1.0, "Merhaba")], &path)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("1\n00:00:00,000 --> 00:00:01,000\nBonjour"));
        assert_eq!(report.entries, 1);
        assert_eq!(report.translated, 1);
        assert_eq!(report.dropped, 0);
    }

    #[tokio::test]
    async fn test_short_segment_is_extended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let translator = echo_translator("Salut");
        let config = Config::default();

        SubtitlePipeline::from_config(&translator, &config)
            .run(&[Segment::new(0.0, 0.1, "Hi")], &path)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("00:00:00,000 --> 00:00:00,500"));
    }

    #[tokio::test]
    async fn test_degenerate_segment_produces_no_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let translator = MockTranslator::new();
        let config = Config::default();

        let report = SubtitlePipeline::from_config(&translator, &config)
            .run(&[Segment::new(1.0, 1.0, "x")], &path)
            .await
            .unwrap();

        assert_eq!(report.entries, 0);
        assert_eq!(report.dropped, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_one_failure_among_three() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|text, _, _| match text {
            "İki" => Err(EmanetError::Translation("model error".to_string())),
            "Bir" => Ok("Un".to_string()),
            _ => Ok("Trois".to_string()),
        });
        let config = Config::default();

        let raw = vec![
            Segment::new(0.0, 1.0, "Bir"),
            Segment::new(1.0, 2.0, "İki"),
            Segment::new(2.0, 3.0, "Üç"),
        ];
        let report = SubtitlePipeline::from_config(&translator, &config)
            .run(&raw, &path)
            .await
            .unwrap();

        assert_eq!(report.entries, 3);
        assert_eq!(report.translated, 2);
        assert_eq!(report.fallbacks.len(), 1);
        assert_eq!(report.fallbacks[0].index, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1\n00:00:00,000 --> 00:00:01,000\nUn\n\n\
             2\n00:00:01,000 --> 00:00:02,000\n[TR] İki\n\n\
             3\n00:00:02,000 --> 00:00:03,000\nTrois\n\n"
        );
    }

    #[tokio::test]
    async fn test_blank_and_empty_translations_keep_one_block_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|text, _, _| match text {
            "Bir" => Ok("Bonjour\n\nÇa va".to_string()),
            "İki" => Ok(String::new()),
            _ => Ok("Fin".to_string()),
        });
        let config = Config::default();

        let raw = vec![
            Segment::new(0.0, 1.0, "Bir"),
            Segment::new(1.0, 2.0, "İki"),
            Segment::new(2.0, 3.0, "Üç"),
        ];
        let report = SubtitlePipeline::from_config(&translator, &config)
            .run(&raw, &path)
            .await
            .unwrap();

        assert_eq!(report.entries, 3);
        assert_eq!(report.fallbacks.len(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1\n00:00:00,000 --> 00:00:01,000\nBonjour\nÇa va\n\n\
             2\n00:00:01,000 --> 00:00:02,000\n[TR] İki\n\n\
             3\n00:00:02,000 --> 00:00:03,000\nFin\n\n"
        );
        assert_eq!(content.trim_end().split("\n\n").count(), 3);
    }

    #[tokio::test]
    async fn test_write_event_follows_translation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let translator = echo_translator("Bonjour");
        let config = Config::default();
        let recorder = RecordingProgress::new();

        let raw = vec![Segment::new(0.0, 1.0, "Bir"), Segment::new(1.0, 2.0, "İki")];
        SubtitlePipeline::from_config(&translator, &config)
            .with_progress(Some(&recorder))
            .run(&raw, &path)
            .await
            .unwrap();

        let events: Vec<(String, f64)> = recorder
            .events()
            .into_iter()
            .map(|e| (e.stage, e.percent))
            .collect();
        assert_eq!(
            events,
            vec![
                (STAGE_TRANSLATE.to_string(), 50.0),
                (STAGE_TRANSLATE.to_string(), 100.0),
                (STAGE_WRITE.to_string(), 100.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.srt");
        let translator = echo_translator("Bonjour");
        let config = Config::default();

        let err = SubtitlePipeline::from_config(&translator, &config)
            .run(&[Segment::new(0.0, 1.0, "Merhaba")], &path)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), "write");
    }
}
