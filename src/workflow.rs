use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, EmanetError};
use crate::fetch::{sanitize_title, validate_locator, FetcherFactory, MediaFetcher};
use crate::media::{PlaybackLauncher, VlcLauncher};
use crate::pipeline::{PipelineReport, SubtitlePipeline};
use crate::progress::{
    ProgressEvent, ProgressReporter, ScaledProgress, STAGE_DONE, STAGE_DOWNLOAD, STAGE_TRANSCRIBE,
    STAGE_TRANSLATE,
};
use crate::segment::Segment;
use crate::transcribe::{RecognizerFactory, SpeechRecognizer};
use crate::translate::{Translator, TranslatorFactory};

/// Collaborators used by a workflow; each one is created once and reused for every video
pub struct Components {
    pub fetcher: Box<dyn MediaFetcher>,
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub translator: Box<dyn Translator>,
    pub launcher: Box<dyn PlaybackLauncher>,
}

impl Components {
    /// yt-dlp, whisper, ollama and vlc, configured from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: FetcherFactory::create_fetcher(config.fetcher.clone(), &config.output),
            recognizer: RecognizerFactory::create_recognizer(config.transcriber.clone()),
            translator: TranslatorFactory::create_translator(config.translate.clone())?,
            launcher: Box::new(VlcLauncher::new(config.playback.clone())),
        })
    }
}

/// Result of processing one video
#[derive(Debug, Clone)]
pub struct VideoOutcome {
    pub title: String,
    pub report: PipelineReport,
    pub elapsed: Duration,
}

/// Result of processing a list of videos
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub successful: Vec<(String, VideoOutcome)>,
    pub failed: Vec<(String, EmanetError)>,
}

pub struct Workflow {
    config: Config,
    components: Components,
    progress: Option<Box<dyn ProgressReporter>>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let components = Components::from_config(&config)?;
        Self::with_components(config, components)
    }

    pub fn with_components(config: Config, components: Components) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            components,
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn report(&self, stage: &str, percent: f64) {
        if let Some(progress) = &self.progress {
            progress.report(&ProgressEvent::new(stage, percent));
        }
    }

    fn pipeline(&self) -> SubtitlePipeline<'_> {
        SubtitlePipeline::from_config(self.components.translator.as_ref(), &self.config)
            .with_progress(self.progress.as_deref())
    }

    /// File name of the subtitles for a video title, e.g. `Emanet 245_FR.srt`
    pub fn subtitle_filename(&self, title: &str) -> String {
        format!("{}_{}.srt", sanitize_title(title), self.config.languages.target_suffix())
    }

    fn finish_progress(&self) {
        if let Some(progress) = &self.progress {
            progress.finish();
        }
    }

    /// Download, transcribe, translate and write subtitles for one video
    pub async fn process_video(&self, locator: &str) -> Result<VideoOutcome> {
        let outcome = self.run_video(locator).await;
        if outcome.is_err() {
            self.finish_progress();
        }
        outcome
    }

    async fn run_video(&self, locator: &str) -> Result<VideoOutcome> {
        let started = Instant::now();
        info!("Processing video: {}", locator);

        if self.config.fetcher.require_youtube {
            validate_locator(locator)?;
        }

        fs::create_dir_all(&self.config.output.dir).await?;

        self.report(STAGE_DOWNLOAD, 10.0);
        let media = self.components.fetcher.fetch(locator).await?;

        let result = self.subtitle_audio(&media.audio_path, &media.title).await;

        if !self.config.output.keep_temp_files {
            self.remove_temp_audio(&media.audio_path).await;
        }

        let report = result?;
        self.report(STAGE_DONE, 100.0);

        let elapsed = started.elapsed();
        info!(
            "Finished {} in {}: {} entries ({} kept in original language)",
            media.title,
            format_elapsed(elapsed),
            report.entries,
            report.fallbacks.len()
        );

        Ok(VideoOutcome {
            title: media.title,
            report,
            elapsed,
        })
    }

    async fn subtitle_audio(&self, audio_path: &Path, title: &str) -> Result<PipelineReport> {
        self.report(STAGE_TRANSCRIBE, 30.0);
        let segments = self
            .components
            .recognizer
            .transcribe(audio_path, &self.config.languages.source)
            .await?;

        self.report(STAGE_TRANSLATE, 60.0);
        let output_path = self.config.output.dir.join(self.subtitle_filename(title));

        // Per-segment translation progress, then the write event, land in 60..=90
        let scaled = self
            .progress
            .as_deref()
            .map(|inner| ScaledProgress::new(inner, 60.0, 90.0));
        SubtitlePipeline::from_config(self.components.translator.as_ref(), &self.config)
            .with_progress(scaled.as_ref().map(|p| p as &dyn ProgressReporter))
            .run(&segments, &output_path)
            .await
    }

    async fn remove_temp_audio(&self, audio_path: &Path) {
        if let Err(e) = fs::remove_file(audio_path).await {
            warn!("Failed to remove temporary audio {}: {}", audio_path.display(), e);
            return;
        }

        // Per-run directory created by the fetcher; only removed when empty
        if let Some(run_dir) = audio_path.parent() {
            if run_dir.starts_with(&self.config.output.temp_dir) && run_dir != self.config.output.temp_dir.as_path() {
                let _ = fs::remove_dir(run_dir).await;
            }
        }
    }

    /// Process videos one after another. A failing video is logged and
    /// skipped; the batch always runs to the end.
    pub async fn process_batch(&self, locators: &[String]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let total = locators.len();
        info!("Processing batch of {} videos", total);

        for (i, locator) in locators.iter().enumerate() {
            info!("--- Video {}/{}: {}", i + 1, total, locator);

            match self.process_video(locator).await {
                Ok(outcome) => {
                    info!("Subtitles: {}", outcome.report.subtitle_path.display());
                    summary.successful.push((locator.clone(), outcome));
                }
                Err(e) => {
                    warn!("Failed to process {} during {}: {}", locator, e.stage(), e);
                    summary.failed.push((locator.clone(), e));
                }
            }

            if i + 1 < total && self.config.batch.pause_secs > 0 {
                info!("Pausing {}s before the next video", self.config.batch.pause_secs);
                tokio::time::sleep(Duration::from_secs(self.config.batch.pause_secs)).await;
            }
        }

        info!(
            "Batch finished: {} succeeded, {} failed",
            summary.successful.len(),
            summary.failed.len()
        );
        summary
    }

    /// Build subtitles from a saved JSON transcript (a list of segments)
    pub async fn subtitle_transcript<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        transcript_path: P,
        output_path: Q,
    ) -> Result<PipelineReport> {
        let transcript_path = transcript_path.as_ref();
        if !transcript_path.exists() {
            return Err(EmanetError::FileNotFound(transcript_path.display().to_string()));
        }

        let content = fs::read_to_string(transcript_path).await?;
        let segments: Vec<Segment> = serde_json::from_str(&content)?;
        info!("Loaded {} segments from {}", segments.len(), transcript_path.display());

        let report = self.pipeline().run(&segments, output_path.as_ref()).await;
        self.finish_progress();
        report
    }

    /// Transcribe an audio file and save the raw segments as JSON
    pub async fn transcribe_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        audio_path: P,
        output_path: Q,
    ) -> Result<usize> {
        let audio_path = audio_path.as_ref();
        if !audio_path.exists() {
            return Err(EmanetError::FileNotFound(audio_path.display().to_string()));
        }

        let segments = self
            .components
            .recognizer
            .transcribe(audio_path, &self.config.languages.source)
            .await?;

        let json = serde_json::to_string_pretty(&segments)?;
        fs::write(output_path.as_ref(), json).await?;
        Ok(segments.len())
    }

    /// Open the video with its subtitles in the external player
    pub async fn play<P: AsRef<Path>>(&self, locator: &str, subtitle_path: P) -> Result<()> {
        self.components
            .launcher
            .launch(locator, subtitle_path.as_ref())
            .await
    }
}

/// Human readable run time, e.g. `3m 07s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    if seconds < 60 {
        format!("{}s", seconds)
    } else {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }
}

/// Read a batch file: one locator per line, blank lines and `#` comments ignored
pub fn parse_locator_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split(" #").next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Path shown to the user, relative to the working directory when possible
pub fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
}
