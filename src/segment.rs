use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A time-bounded unit of recognized speech text, timestamps in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new<S: Into<String>>(start: f64, end: f64, text: S) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A segment after the translation stage.
///
/// `translated == false` marks a fallback entry: `text` then holds the
/// original-language text prefixed with the source language tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub translated: bool,
}

/// One numbered block of a subtitle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub content: String,
}

/// Convert seconds to a duration rounded to the nearest millisecond.
/// Negative and non-finite inputs map to zero.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_millis((seconds * 1000.0).round() as u64)
}
