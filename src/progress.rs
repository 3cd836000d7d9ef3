use indicatif::{ProgressBar, ProgressStyle};
#[cfg(test)]
use std::sync::Mutex;
use tracing::info;

pub const STAGE_DOWNLOAD: &str = "download";
pub const STAGE_TRANSCRIBE: &str = "transcribe";
pub const STAGE_TRANSLATE: &str = "translate";
pub const STAGE_WRITE: &str = "write";
pub const STAGE_DONE: &str = "done";

/// Structured progress notification: which stage is running and how far along it is
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub stage: String,
    /// 0..=100
    pub percent: f64,
}

impl ProgressEvent {
    pub fn new<S: Into<String>>(stage: S, percent: f64) -> Self {
        Self {
            stage: stage.into(),
            percent: percent.clamp(0.0, 100.0),
        }
    }

    /// Progress of `completed` out of `total` items; an empty batch counts as finished
    pub fn fraction<S: Into<String>>(stage: S, completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self::new(stage, percent)
    }
}

/// Receives progress events synchronously, in the order they happen
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);

    /// Called once a run is over, whether it succeeded or not
    fn finish(&self) {}
}

/// Terminal progress bar for interactive runs
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: &ProgressEvent) {
        self.bar.set_message(event.stage.clone());
        self.bar.set_position(event.percent.round() as u64);
        if event.stage == STAGE_DONE {
            self.bar.finish_with_message("done");
        }
    }

    fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Emits each event as an info log line; used for non-interactive runs
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: &ProgressEvent) {
        info!("[{}] {:.0}%", event.stage, event.percent);
    }
}

/// Maps the 0..=100 progress of one stage onto a slice of the overall run
pub struct ScaledProgress<'a> {
    inner: &'a dyn ProgressReporter,
    from: f64,
    to: f64,
}

impl<'a> ScaledProgress<'a> {
    pub fn new(inner: &'a dyn ProgressReporter, from: f64, to: f64) -> Self {
        Self { inner, from, to }
    }
}

impl ProgressReporter for ScaledProgress<'_> {
    fn report(&self, event: &ProgressEvent) {
        let percent = self.from + event.percent / 100.0 * (self.to - self.from);
        self.inner.report(&ProgressEvent::new(event.stage.clone(), percent));
    }
}

/// Keeps every event in memory
#[cfg(test)]
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

#[cfg(test)]
impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ProgressReporter for RecordingProgress {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
