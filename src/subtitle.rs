use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::config::SubtitleConfig;
use crate::error::{Result, EmanetError};
use crate::segment::{seconds_to_duration, SubtitleEntry, TranslatedSegment};

/// Rendering policy for subtitle text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Wrap content to this many characters per line
    pub wrap_width: Option<usize>,
    /// Preferred line count per entry, only reported when exceeded
    pub max_lines: Option<usize>,
}

impl From<&SubtitleConfig> for Layout {
    fn from(config: &SubtitleConfig) -> Self {
        Self {
            wrap_width: config.wrap_lines.then_some(config.max_line_length),
            max_lines: Some(config.max_lines),
        }
    }
}

/// Number translated segments from 1, in input order
pub fn build_entries(segments: &[TranslatedSegment]) -> Vec<SubtitleEntry> {
    segments
        .iter()
        .enumerate()
        .map(|(position, segment)| SubtitleEntry {
            index: position + 1,
            start: seconds_to_duration(segment.start),
            end: seconds_to_duration(segment.end),
            content: segment.text.clone(),
        })
        .collect()
}

/// Render entries to the body of an SRT file
pub fn render_srt(entries: &[SubtitleEntry], layout: &Layout) -> String {
    let mut srt_content = String::new();

    for entry in entries {
        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            entry.index,
            format_srt_time(entry.start),
            format_srt_time(entry.end),
            layout_content(entry, layout)
        ));
    }

    srt_content
}

/// Content lines of one block: each line trimmed, blank lines removed so the
/// text can never end the block early, then wrapped when the layout asks for it
fn layout_content(entry: &SubtitleEntry, layout: &Layout) -> String {
    let lines = entry
        .content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let lines: Vec<String> = match layout.wrap_width {
        Some(width) => lines
            .flat_map(|line| textwrap::wrap(line, width))
            .map(|line| line.into_owned())
            .collect(),
        None => lines.map(str::to_string).collect(),
    };

    if let Some(max_lines) = layout.max_lines {
        if lines.len() > max_lines {
            debug!(
                "Subtitle {} spans {} lines (preferred maximum {})",
                entry.index,
                lines.len(),
                max_lines
            );
        }
    }

    lines.join("\n")
}

/// Render translated segments and write them to `output_path` as UTF-8,
/// replacing any existing file. Returns the written content.
pub async fn write_srt<P: AsRef<Path>>(
    segments: &[TranslatedSegment],
    output_path: P,
    layout: &Layout,
) -> Result<String> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    let entries = build_entries(segments);
    let srt_content = render_srt(&entries, layout);

    fs::write(output_path, &srt_content)
        .await
        .map_err(|source| EmanetError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

    info!("SRT file generated with {} entries", entries.len());
    Ok(srt_content)
}

/// Format a timestamp as `HH:MM:SS,mmm`; hours are not wrapped
pub fn format_srt_time(time: Duration) -> String {
    let total_milliseconds = time.as_millis();
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
