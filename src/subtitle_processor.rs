use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::errors::SubtitleError;

// @module: Subtitle file parsing into timed plain-text events

// @const: SRT timestamp line (comma or dot before the milliseconds)
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: WebVTT cue timing line, hours optional, cue settings ignored
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})\s+-->\s+(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})").unwrap()
});

// @const: ASS override blocks such as {\i1} or {\pos(10,10)}
static ASS_OVERRIDE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]*\}").unwrap()
});

// @const: HTML-style markup used by SRT and VTT
static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[a-zA-Z][^>]*>").unwrap()
});

/// Field order used when an ASS/SSA file has no Format line
const DEFAULT_ASS_FORMAT: [&str; 10] = [
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

// @struct: Single timed subtitle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEvent {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Plain text, formatting removed, lines separated by '\n'
    pub text: String,
}

impl SubtitleEvent {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEvent {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Parse a `HH:MM:SS,mmm` (or `H:MM:SS.cc`) timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(invalid());
        }

        let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: u64 = parts[2].parse().map_err(|_| invalid())?;
        let fraction: u64 = parts[3].parse().map_err(|_| invalid())?;

        // ASS uses centiseconds, SRT and VTT use milliseconds
        let millis = match parts[3].len() {
            1 => fraction * 100,
            2 => fraction * 10,
            3 => fraction,
            _ => return Err(invalid()),
        };

        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        to_millis(hours, minutes, seconds, millis).ok_or_else(invalid)
    }

    /// Length of the event in milliseconds, zero for inverted ranges
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Supported subtitle container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    /// Advanced SubStation Alpha, also used for SSA
    Ass,
    Vtt,
}

impl SubtitleFormat {
    /// File extensions recognised as subtitle tracks
    pub const EXTENSIONS: [&'static str; 4] = ["ass", "ssa", "srt", "vtt"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "ass" | "ssa" => Some(Self::Ass),
            "vtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    /// Guess the format from file content
    pub fn sniff(content: &str) -> Self {
        let head = content.trim_start_matches('\u{feff}').trim_start();
        if head.starts_with("WEBVTT") {
            Self::Vtt
        } else if head.starts_with("[Script Info]") || content.contains("\nDialogue:") {
            Self::Ass
        } else {
            Self::Srt
        }
    }
}

/// Subtitle parsing entry points
pub struct SubtitleParser;

impl SubtitleParser {
    /// Read and parse a subtitle file, choosing the format by extension
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleEvent>> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;
        let content = String::from_utf8_lossy(&bytes);

        let format = path
            .extension()
            .and_then(|e| SubtitleFormat::from_extension(&e.to_string_lossy()))
            .unwrap_or_else(|| SubtitleFormat::sniff(&content));

        let events = Self::parse_str(&content, format)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", path))?;
        debug!("Parsed {} events from {:?}", events.len(), path);
        Ok(events)
    }

    /// Parse subtitle content in the given format
    pub fn parse_str(content: &str, format: SubtitleFormat) -> Result<Vec<SubtitleEvent>, SubtitleError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut events = match format {
            SubtitleFormat::Srt => Self::parse_srt_string(content),
            SubtitleFormat::Ass => Self::parse_ass_string(content)?,
            SubtitleFormat::Vtt => Self::parse_vtt_string(content),
        };

        if events.is_empty() {
            return Err(SubtitleError::NoEvents(format!("{:?} content", format)));
        }

        // Sort by start time to ensure correct order
        events.sort_by_key(|e| (e.start_ms, e.end_ms));
        Ok(events)
    }

    /// Parse SRT content; malformed blocks are skipped with a warning
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleEvent> {
        let mut events = Vec::new();
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut flush = |times: &mut Option<(u64, u64)>, text: &mut String| {
            if let Some((start_ms, end_ms)) = times.take() {
                let cleaned = strip_markup(text);
                if !cleaned.trim().is_empty() {
                    events.push(SubtitleEvent::new(start_ms, end_ms, cleaned.trim()));
                }
            }
            text.clear();
        };

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // Blank line ends the current block
            if trimmed.is_empty() {
                flush(&mut current_times, &mut current_text);
                continue;
            }

            if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
                // A timing line without a blank separator still starts a new block
                flush(&mut current_times, &mut current_text);
                match (timestamp_from_captures(&caps, 1), timestamp_from_captures(&caps, 5)) {
                    (Some(start_ms), Some(end_ms)) => current_times = Some((start_ms, end_ms)),
                    _ => warn!("Timestamp out of range at line {}: {}", line_idx + 1, trimmed),
                }
                continue;
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else if trimmed.parse::<usize>().is_err() {
                warn!("Unexpected text at line {} before timestamp: {}", line_idx + 1, trimmed);
            }
        }
        flush(&mut current_times, &mut current_text);

        events
    }

    /// Parse ASS/SSA content from the `[Events]` section
    pub fn parse_ass_string(content: &str) -> Result<Vec<SubtitleEvent>, SubtitleError> {
        let mut events = Vec::new();
        let mut in_events = false;
        let mut format: Vec<String> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_events = trimmed.eq_ignore_ascii_case("[events]");
                continue;
            }
            if !in_events {
                continue;
            }

            if let Some(fields) = trimmed.strip_prefix("Format:") {
                format = fields.split(',').map(|f| f.trim().to_ascii_lowercase()).collect();
                continue;
            }

            let Some(body) = trimmed.strip_prefix("Dialogue:") else {
                continue;
            };

            if format.is_empty() {
                format = DEFAULT_ASS_FORMAT.iter().map(|f| f.to_string()).collect();
            }

            let field_index = |name: &str| format.iter().position(|f| f == name);
            let (Some(start_idx), Some(end_idx), Some(text_idx)) =
                (field_index("start"), field_index("end"), field_index("text"))
            else {
                return Err(SubtitleError::MalformedEvents(
                    "Format line lacks Start, End or Text".to_string(),
                ));
            };

            // Text is the last field and may itself contain commas
            let fields: Vec<&str> = body.trim_start().splitn(format.len(), ',').collect();
            if fields.len() <= text_idx.max(start_idx).max(end_idx) {
                warn!("Skipping short Dialogue line: {}", trimmed);
                continue;
            }

            let times = (
                SubtitleEvent::parse_timestamp(fields[start_idx]),
                SubtitleEvent::parse_timestamp(fields[end_idx]),
            );
            match times {
                (Ok(start_ms), Ok(end_ms)) => {
                    events.push(SubtitleEvent::new(start_ms, end_ms, ass_plain_text(fields[text_idx])));
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Skipping Dialogue line: {}", e);
                }
            }
        }

        Ok(events)
    }

    /// Parse WebVTT content; NOTE, STYLE and REGION blocks are skipped
    pub fn parse_vtt_string(content: &str) -> Vec<SubtitleEvent> {
        let mut events = Vec::new();

        for block in split_blocks(content) {
            let mut lines = block.iter().copied();
            let Some(timing_line) = lines.by_ref().find(|l| l.contains("-->")) else {
                continue;
            };
            let Some(caps) = VTT_TIMESTAMP_REGEX.captures(timing_line.trim()) else {
                warn!("Invalid VTT cue timing: {}", timing_line);
                continue;
            };

            let (Some(start_ms), Some(end_ms)) =
                (timestamp_from_captures(&caps, 1), timestamp_from_captures(&caps, 5))
            else {
                warn!("VTT cue timing out of range: {}", timing_line);
                continue;
            };

            let text = lines.map(str::trim).collect::<Vec<_>>().join("\n");
            let cleaned = strip_markup(&text);
            if cleaned.trim().is_empty() {
                continue;
            }

            events.push(SubtitleEvent::new(start_ms, end_ms, cleaned.trim()));
        }

        events
    }
}

/// Split content into blank-line separated blocks
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Hours are optional in the capture group (VTT) and default to zero;
/// `None` when a field does not fit
fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
    let field = |offset: usize| match caps.get(start_idx + offset) {
        Some(m) => m.as_str().parse::<u64>().ok(),
        None => Some(0),
    };
    to_millis(field(0)?, field(1)?, field(2)?, field(3)?)
}

/// Combine clock fields into milliseconds without overflowing
fn to_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds.checked_mul(1_000)?)?
        .checked_add(millis)
}

fn strip_markup(text: &str) -> String {
    MARKUP_TAG_REGEX.replace_all(text, "").into_owned()
}

/// Plain text of an ASS dialogue field
fn ass_plain_text(text: &str) -> String {
    let text = ASS_OVERRIDE_REGEX.replace_all(text, "");
    text.replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
        .trim()
        .to_string()
}
