use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Script utilities for Japanese text
///
/// This module provides character-class checks (kana, kanji), kana
/// conversion, and the detector used to drop vector drawing commands that
/// some subtitle tracks embed as dialogue.

// @const: Any hiragana, katakana or common CJK ideograph
static JAPANESE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{3040}-\x{30ff}\x{4e00}-\x{9faf}]").unwrap()
});

// @const: Base forms made only of digits, whitespace and ASCII letters
static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\d\sa-zA-Z]+$").unwrap()
});

/// Default drawing command heuristic: `m`, `l` or `b` followed by a coordinate
pub const DEFAULT_DRAWING_PATTERN: &str = r"\b[mlb]\s+-?\d";

static DEFAULT_DRAWING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_DRAWING_PATTERN).unwrap()
});

/// Whether the text contains at least one Japanese character
pub fn contains_japanese(text: &str) -> bool {
    JAPANESE_REGEX.is_match(text)
}

/// Whether a character is a kanji in the common CJK block
pub fn is_kanji(c: char) -> bool {
    ('\u{4e00}'..='\u{9faf}').contains(&c)
}

/// Whether a character sits in the katakana block
pub fn is_katakana(c: char) -> bool {
    ('\u{30a0}'..='\u{30ff}').contains(&c)
}

/// Whether the text is non-empty and made only of katakana
pub fn is_all_katakana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_katakana)
}

/// Whether a base form is "not a word" (numbers, romaji, whitespace)
pub fn is_non_word(text: &str) -> bool {
    NON_WORD_REGEX.is_match(text)
}

/// Iterate over the kanji characters of a string
pub fn kanji_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| is_kanji(*c))
}

/// Convert katakana to hiragana, leaving every other character untouched
///
/// The prolonged sound mark `ー` and the middle dot have no hiragana
/// counterpart and are kept as-is.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30a1}'..='\u{30f6}' | '\u{30fd}' | '\u{30fe}' => {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Detects vector drawing commands embedded in subtitle dialogue
///
/// A line is a drawing command when it contains no Japanese character and
/// matches any of the configured patterns.
#[derive(Debug, Clone)]
pub struct DrawingCommandDetector {
    patterns: Vec<Regex>,
}

impl DrawingCommandDetector {
    /// Compile a detector from a list of regex patterns
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref())
                    .with_context(|| format!("Invalid drawing command pattern: {}", p.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_drawing_command(&self, line: &str) -> bool {
        if contains_japanese(line) {
            return false;
        }
        self.patterns.iter().any(|p| p.is_match(line))
    }
}

impl Default for DrawingCommandDetector {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_DRAWING_REGEX.clone()],
        }
    }
}
