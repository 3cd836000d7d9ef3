use tracing::debug;

use crate::config::SubtitleConfig;
use crate::segment::Segment;

/// Display duration bounds applied to every subtitle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPolicy {
    pub min_duration: f64,
    pub max_duration: f64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            min_duration: 0.5,
            max_duration: 7.0,
        }
    }
}

impl From<&SubtitleConfig> for TimingPolicy {
    fn from(config: &SubtitleConfig) -> Self {
        Self {
            min_duration: config.min_duration,
            max_duration: config.max_duration,
        }
    }
}

impl TimingPolicy {
    fn clamp_end(&self, start: f64, end: f64) -> f64 {
        let duration = end - start;
        if duration < self.min_duration {
            start + self.min_duration
        } else if duration > self.max_duration {
            start + self.max_duration
        } else {
            end
        }
    }
}

/// Repair raw recognizer segments.
///
/// Text is trimmed and empty segments are dropped. Negative start times are
/// raised to zero. A segment that does not start strictly after the previously
/// kept one, or that ends at or before its start, is dropped. Remaining durations are
/// stretched or cut to fit the policy. Relative order is kept as is.
pub fn normalize_segments(segments: &[Segment], policy: &TimingPolicy) -> Vec<Segment> {
    let mut normalized = Vec::with_capacity(segments.len());
    let mut previous_start: Option<f64> = None;

    for (idx, segment) in segments.iter().enumerate() {
        let text = segment.text.trim();
        if text.is_empty() {
            debug!("Dropping segment {}: empty text", idx);
            continue;
        }

        if !segment.start.is_finite() || !segment.end.is_finite() {
            debug!("Dropping segment {}: non-finite timestamps", idx);
            continue;
        }

        let start = segment.start.max(0.0);
        if let Some(previous) = previous_start.filter(|previous| start <= *previous) {
            debug!(
                "Dropping segment {}: start {:.3}s is not after previous start {:.3}s",
                idx, start, previous
            );
            continue;
        }

        if segment.end <= start {
            debug!(
                "Dropping segment {}: end {:.3}s is not after start {:.3}s",
                idx, segment.end, start
            );
            continue;
        }

        let end = policy.clamp_end(start, segment.end);
        previous_start = Some(start);

        normalized.push(Segment {
            start,
            end,
            text: text.to_string(),
        });
    }

    if normalized.len() != segments.len() {
        debug!(
            "Normalization kept {} of {} segments",
            normalized.len(),
            segments.len()
        );
    }

    normalized
}
