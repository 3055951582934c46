use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language_utils::kanji_chars;
use crate::stats::{round_to, FrequencyMap};
use crate::vocabulary::EnrichedToken;

// @module: Word, kanji and sentence level counts

// @const: Sentence-ending punctuation
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[。！？?!]").unwrap()
});

/// Lexical counts for one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalStats {
    pub total_words: u64,
    pub total_characters: u64,
    pub frequency_map: FrequencyMap,
    pub unique_words: u64,
    pub unique_words_once: u64,
    pub kanji_freq_map: FrequencyMap,
    pub unique_kanji: u64,
    pub unique_kanji_once: u64,
}

/// Sentence metrics of the raw text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_sentence_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<u64>,
}

/// Number of keys and number of keys seen exactly once
pub fn unique_counts(map: &FrequencyMap) -> (u64, u64) {
    let once = map.values().filter(|&&count| count == 1).count();
    (map.len() as u64, once as u64)
}

/// Word counts come from valid tokens; kanji and characters from all tokens
pub fn lexical_stats(valid: &[&EnrichedToken], all: &[EnrichedToken]) -> LexicalStats {
    let mut frequency_map = FrequencyMap::new();
    for token in valid {
        *frequency_map.entry(token.base_form.clone()).or_default() += 1;
    }

    let mut kanji_freq_map = FrequencyMap::new();
    let mut total_characters = 0u64;
    for token in all {
        total_characters += token.surface.chars().count() as u64;
        for kanji in kanji_chars(&token.surface) {
            *kanji_freq_map.entry(kanji.to_string()).or_default() += 1;
        }
    }

    let (unique_words, unique_words_once) = unique_counts(&frequency_map);
    let (unique_kanji, unique_kanji_once) = unique_counts(&kanji_freq_map);

    LexicalStats {
        total_words: valid.len() as u64,
        total_characters,
        frequency_map,
        unique_words,
        unique_words_once,
        kanji_freq_map,
        unique_kanji,
        unique_kanji_once,
    }
}

/// Sentence count and average sentence length; empty for empty text
pub fn detailed_stats(text: &str) -> DetailedStats {
    if text.is_empty() {
        return DetailedStats::default();
    }

    let sentence_count = sentence_count(text);
    let length = text.chars().count() as f64;

    DetailedStats {
        average_sentence_length: Some(round_to(length / sentence_count as f64, 1)),
        sentence_count: Some(sentence_count),
    }
}

/// Number of sentence terminators, at least one
pub fn sentence_count(text: &str) -> u64 {
    SENTENCE_END_REGEX.find_iter(text).count().max(1) as u64
}
