use assert_fs::TempDir;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use emanet::config::Config;
use emanet::error::{EmanetError, Result};
use emanet::fetch::{FetchedMedia, MediaFetcher};
use emanet::media::PlaybackLauncher;
use emanet::progress::{ProgressEvent, ProgressReporter};
use emanet::segment::Segment;
use emanet::transcribe::SpeechRecognizer;
use emanet::translate::Translator;
use emanet::workflow::{Components, Workflow};

/// Writes a dummy audio file into a per-video directory, fails for locators containing "broken"
struct FakeFetcher {
    temp_dir: PathBuf,
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedMedia> {
        if locator.contains("broken") {
            return Err(EmanetError::Fetch(format!("video unavailable: {}", locator)));
        }

        let id = locator.rsplit('/').next().unwrap_or("video");
        let run_dir = self.temp_dir.join(id);
        std::fs::create_dir_all(&run_dir)?;
        let audio_path = run_dir.join("audio.wav");
        std::fs::write(&audio_path, b"RIFF")?;

        Ok(FetchedMedia {
            audio_path,
            title: format!("Emanet {}", id),
        })
    }
}

struct FakeRecognizer;

#[async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn transcribe(&self, audio_path: &Path, language_hint: &str) -> Result<Vec<Segment>> {
        assert!(audio_path.exists());
        assert_eq!(language_hint, "tr");
        Ok(vec![
            Segment::new(0.0, 2.0, "Merhaba"),
            Segment::new(2.5, 4.0, "İki"),
            Segment::new(5.0, 5.0, "Boş"),
        ])
    }
}

/// Translates from a fixed table; anything else is a failure
struct TableTranslator;

#[async_trait]
impl Translator for TableTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        match text {
            "Merhaba" => Ok("Bonjour".to_string()),
            other => Err(EmanetError::Translation(format!("no translation for {}", other))),
        }
    }
}

#[derive(Default, Clone)]
struct RecordingLauncher {
    launches: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

#[async_trait]
impl PlaybackLauncher for RecordingLauncher {
    async fn launch(&self, locator: &str, subtitle_path: &Path) -> Result<()> {
        self.launches
            .lock()
            .unwrap()
            .push((locator.to_string(), subtitle_path.to_path_buf()));
        Ok(())
    }
}

#[derive(Default, Clone)]
struct SharedProgress {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
    finished: Arc<AtomicBool>,
}

impl ProgressReporter for SharedProgress {
    fn report(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.output.dir = root.join("subtitles");
    config.output.temp_dir = root.join("temp");
    config.batch.pause_secs = 0;
    config
}

fn test_workflow(config: Config) -> Workflow {
    test_workflow_with_launcher(config, RecordingLauncher::default())
}

fn test_workflow_with_launcher(config: Config, launcher: RecordingLauncher) -> Workflow {
    let components = Components {
        fetcher: Box::new(FakeFetcher {
            temp_dir: config.output.temp_dir.clone(),
        }),
        recognizer: Box::new(FakeRecognizer),
        translator: Box::new(TableTranslator),
        launcher: Box::new(launcher),
    };
    Workflow::with_components(config, components).unwrap()
}

const EXPECTED_SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nBonjour\n\n2\n00:00:02,500 --> 00:00:04,000\n[TR] İki\n\n";

#[tokio::test]
async fn process_video_writes_french_subtitles() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let outcome = workflow
        .process_video("https://youtu.be/245")
        .await
        .unwrap();

    let expected_path = root.path().join("subtitles").join("Emanet 245_FR.srt");
    assert_eq!(outcome.title, "Emanet 245");
    assert_eq!(outcome.report.subtitle_path, expected_path);
    assert_eq!(outcome.report.entries, 2);
    assert_eq!(outcome.report.translated, 1);
    assert_eq!(outcome.report.fallbacks.len(), 1);
    assert_eq!(outcome.report.dropped, 1);

    let content = std::fs::read_to_string(&expected_path).unwrap();
    assert_eq!(content, EXPECTED_SRT);
}

#[tokio::test]
async fn process_video_removes_temporary_audio() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    workflow.process_video("https://youtu.be/246").await.unwrap();

    let run_dir = root.path().join("temp").join("246");
    assert!(!run_dir.join("audio.wav").exists());
    assert!(!run_dir.exists());
}

#[tokio::test]
async fn process_video_keeps_audio_when_configured() {
    let root = TempDir::new().unwrap();
    let mut config = test_config(root.path());
    config.output.keep_temp_files = true;
    let workflow = test_workflow(config);

    workflow.process_video("https://youtu.be/247").await.unwrap();

    assert!(root.path().join("temp").join("247").join("audio.wav").exists());
}

#[tokio::test]
async fn fetch_failure_surfaces_without_output() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let err = workflow
        .process_video("https://youtu.be/broken")
        .await
        .unwrap_err();

    assert!(matches!(err, EmanetError::Fetch(_)));
    assert_eq!(err.stage(), "download");

    let written = std::fs::read_dir(root.path().join("subtitles")).unwrap().count();
    assert_eq!(written, 0);
}

#[tokio::test]
async fn non_youtube_locator_is_rejected() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let err = workflow
        .process_video("https://example.com/video")
        .await
        .unwrap_err();

    assert!(matches!(err, EmanetError::InvalidLocator(_)));
}

#[tokio::test]
async fn batch_continues_after_failure() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let locators = vec![
        "https://youtu.be/1".to_string(),
        "https://youtu.be/broken".to_string(),
        "https://youtu.be/2".to_string(),
    ];
    let summary = workflow.process_batch(&locators).await;

    assert_eq!(summary.successful.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "https://youtu.be/broken");
    assert!(root.path().join("subtitles").join("Emanet 1_FR.srt").exists());
    assert!(root.path().join("subtitles").join("Emanet 2_FR.srt").exists());
}

#[tokio::test]
async fn subtitle_transcript_from_json() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let transcript = root.path().join("transcript.json");
    std::fs::write(
        &transcript,
        r#"[{"start": 0.0, "end": 2.0, "text": "Merhaba"}, {"start": 2.5, "end": 4.0, "text": "İki"}]"#,
    )
    .unwrap();
    let output = root.path().join("out.srt");

    let report = workflow.subtitle_transcript(&transcript, &output).await.unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED_SRT);
}

#[tokio::test]
async fn transcribe_file_saves_segments() {
    let root = TempDir::new().unwrap();
    let workflow = test_workflow(test_config(root.path()));

    let audio = root.path().join("episode.wav");
    std::fs::write(&audio, b"RIFF").unwrap();
    let output = root.path().join("episode.json");

    let count = workflow.transcribe_file(&audio, &output).await.unwrap();

    assert_eq!(count, 3);
    let saved: Vec<Segment> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved[1].text, "İki");
}

#[tokio::test]
async fn play_hands_locator_and_subtitles_to_launcher() {
    let root = TempDir::new().unwrap();
    let launcher = RecordingLauncher::default();
    let workflow = test_workflow_with_launcher(test_config(root.path()), launcher.clone());

    let srt = root.path().join("episode.srt");
    workflow.play("https://youtu.be/245", &srt).await.unwrap();

    let launches = launcher.launches.lock().unwrap();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0], ("https://youtu.be/245".to_string(), srt));
}

#[tokio::test]
async fn process_video_progress_never_moves_backwards() {
    let root = TempDir::new().unwrap();
    let progress = SharedProgress::default();
    let workflow = test_workflow(test_config(root.path())).with_progress(Box::new(progress.clone()));

    workflow.process_video("https://youtu.be/245").await.unwrap();

    let events: Vec<(String, f64)> = progress
        .events
        .lock()
        .unwrap()
        .iter()
        .map(|e| (e.stage.clone(), e.percent))
        .collect();
    let expected: Vec<(String, f64)> = [
        ("download", 10.0),
        ("transcribe", 30.0),
        ("translate", 60.0),
        ("translate", 75.0),
        ("translate", 90.0),
        ("write", 90.0),
        ("done", 100.0),
    ]
    .iter()
    .map(|(stage, percent)| (stage.to_string(), *percent))
    .collect();
    assert_eq!(events, expected);
    assert!(events.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[tokio::test]
async fn failed_video_finishes_progress() {
    let root = TempDir::new().unwrap();
    let progress = SharedProgress::default();
    let workflow = test_workflow(test_config(root.path())).with_progress(Box::new(progress.clone()));

    assert!(workflow.process_video("https://youtu.be/broken").await.is_err());

    assert!(progress.finished.load(Ordering::SeqCst));
}
