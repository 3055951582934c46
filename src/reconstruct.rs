/*!
 * Sentence reconstruction from timed subtitle events.
 *
 * Subtitle tracks split speech into short, noisy fragments. This module
 * stitches fragments back into sentences using the silence between events,
 * drops annotation and rendering artifacts, and measures how long text is
 * actually on screen.
 */

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::language_utils::DrawingCommandDetector;
use crate::subtitle_processor::SubtitleEvent;

// @const: Speaker tags and sound-effect notes such as （ナレーション） or [拍手]
static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[（(\[].*?[）)\]]").unwrap()
});

// @const: Leftover override blocks or escape sequences at the start of a line
static TAG_GARBAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{|^\\[a-zA-Z]").unwrap()
});

/// Characters that already terminate a sentence
const TERMINAL_PUNCTUATION: [char; 5] = ['。', '！', '？', '?', '!'];

/// Appended to a sentence that has no terminal punctuation
const SENTENCE_CLOSER: char = '。';

/// Options controlling sentence reconstruction
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Gap (ms) above which the current sentence is closed
    pub gap_threshold_ms: u64,

    /// Detector for vector drawing commands
    pub drawing: DrawingCommandDetector,
}

impl ReconstructOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            gap_threshold_ms: config.reconstruct.gap_threshold_ms,
            drawing: DrawingCommandDetector::new(&config.filters.drawing_command_patterns)?,
        })
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            gap_threshold_ms: 500,
            drawing: DrawingCommandDetector::default(),
        }
    }
}

/// Sentences rebuilt from an episode plus its on-screen time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructedText {
    pub sentences: Vec<String>,
    pub active_seconds: f64,
}

impl ReconstructedText {
    /// Full text, each sentence followed by a newline
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.sentences.iter().map(|s| s.len() + 1).sum());
        for sentence in &self.sentences {
            text.push_str(sentence);
            text.push('\n');
        }
        text
    }

    pub fn is_blank(&self) -> bool {
        self.sentences.iter().all(|s| s.trim().is_empty())
    }
}

/// Remove bracketed annotations and surrounding whitespace
pub fn clean_event_text(text: &str) -> String {
    ANNOTATION_REGEX.replace_all(text, "").trim().to_string()
}

/// ASCII and full-width digits only; kanji numerals and roman numerals are words
fn is_numeric_only(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit() || ('０'..='９').contains(&c))
}

fn close_sentence(pieces: &mut Vec<String>, sentences: &mut Vec<String>) {
    if pieces.is_empty() {
        return;
    }
    let mut sentence = pieces.concat();
    pieces.clear();
    if !sentence.ends_with(TERMINAL_PUNCTUATION) {
        sentence.push(SENTENCE_CLOSER);
    }
    sentences.push(sentence);
}

/// Rebuild sentences from subtitle events
///
/// Events are processed in `(start, end)` order regardless of input order.
/// Retained events are concatenated until the gap between the previous
/// retained event's end and the next start exceeds the threshold.
pub fn reconstruct(events: &[SubtitleEvent], options: &ReconstructOptions) -> ReconstructedText {
    let mut ordered: Vec<&SubtitleEvent> = events.iter().collect();
    ordered.sort_by_key(|e| (e.start_ms, e.end_ms));

    let mut sentences = Vec::new();
    let mut pieces: Vec<String> = Vec::new();
    let mut last_text: Option<String> = None;
    let mut last_end: Option<u64> = None;

    for event in ordered {
        let text = clean_event_text(&event.text);

        if text.is_empty()
            || TAG_GARBAGE_REGEX.is_match(&text)
            || options.drawing.is_drawing_command(&text)
            || is_numeric_only(&text)
            || last_text.as_deref() == Some(text.as_str())
        {
            continue;
        }

        if let Some(end) = last_end {
            // Overlapping events produce a negative gap and never split
            let gap = event.start_ms as i64 - end as i64;
            if gap > options.gap_threshold_ms as i64 {
                close_sentence(&mut pieces, &mut sentences);
            }
        }

        pieces.push(text.clone());
        last_text = Some(text);
        last_end = Some(event.end_ms);
    }
    close_sentence(&mut pieces, &mut sentences);

    ReconstructedText {
        sentences,
        active_seconds: active_seconds(events),
    }
}

/// Merge intervals that overlap or touch
///
/// Input order does not matter; the result is sorted and disjoint.
pub fn merge_intervals(mut intervals: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    intervals.retain(|(start, end)| end > start);
    intervals.sort_unstable();

    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Seconds during which at least one event is on screen
pub fn active_seconds(events: &[SubtitleEvent]) -> f64 {
    let intervals = events.iter().map(|e| (e.start_ms, e.end_ms)).collect();
    let total_ms: u64 = merge_intervals(intervals)
        .iter()
        .map(|(start, end)| end - start)
        .sum();
    total_ms as f64 / 1000.0
}

/// Whole seconds from the first event's start to the last event's end
pub fn duration_seconds(events: &[SubtitleEvent]) -> u64 {
    let first_start = events.iter().map(|e| e.start_ms).min();
    let last_end = events.iter().max_by_key(|e| (e.start_ms, e.end_ms)).map(|e| e.end_ms);
    match (first_start, last_end) {
        (Some(start), Some(end)) => end.saturating_sub(start) / 1000,
        _ => 0,
    }
}
