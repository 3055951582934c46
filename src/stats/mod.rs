/*!
 * Statistics engine.
 *
 * Turns enriched tokens and the reconstructed text of one episode into an
 * `EpisodeStats` record:
 * - `filters`: which tokens count as vocabulary
 * - `lexical`: word, kanji and sentence counts
 * - `distribution`: part-of-speech and JLPT distributions
 * - `coverage`: general and local coverage curves
 * - `difficulty`: readability and ML difficulty scaling
 *
 * Records serialize to the JSON layout consumed by the front-end.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod coverage;
pub mod difficulty;
pub mod distribution;
pub mod filters;
pub mod lexical;

pub use coverage::{RankCoverage, Thresholds, UniqueCoverage, WordCount};
pub use difficulty::{JReadabilityScorer, Readability, ReadabilityScorer};
pub use distribution::{JlptDistribution, JlptLevel, PosCategory, PosDistribution};
pub use filters::is_valid_token;
pub use lexical::DetailedStats;

use crate::vocabulary::EnrichedToken;

/// Word (or kanji) to occurrence count
pub type FrequencyMap = BTreeMap<String, u64>;

/// Round to the given number of decimals.
///
/// Rounding is done on the exact binary value with ties to even, so `0.125`
/// becomes `0.12` while `2.675` (stored just below) becomes `2.67`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Where an episode record came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMeta {
    pub episode_number: u32,
    pub series_title: String,
    pub filename: String,
}

/// Statistics for a single episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeStats {
    pub total_words: u64,
    pub total_characters: u64,
    pub unique_words: u64,
    pub unique_words_once: u64,
    pub unique_kanji: u64,
    pub unique_kanji_once: u64,

    pub jr_difficulty: f64,
    pub raw_jr_difficulty: f64,
    pub ml_difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ml_difficulty: Option<f64>,

    pub duration_seconds: u64,
    pub cpm: f64,

    pub jlpt_distribution: JlptDistribution,
    pub pos_distribution: PosDistribution,

    pub general_vocab_stats: Vec<RankCoverage>,
    pub general_vocab_thresholds: Thresholds,
    pub local_vocab_stats: Vec<UniqueCoverage>,
    pub local_vocab_thresholds: Thresholds,

    pub frequency_map: FrequencyMap,
    pub kanji_freq_map: FrequencyMap,

    pub detailed_stats: DetailedStats,

    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<EpisodeMeta>,
}

impl EpisodeStats {
    /// Characters per minute of on-screen time, zero when nothing was shown
    pub fn set_timing(&mut self, active_seconds: f64, duration_seconds: u64) {
        self.duration_seconds = duration_seconds;
        self.cpm = if active_seconds > 0.0 {
            round_to(self.total_characters as f64 / active_seconds * 60.0, 1)
        } else {
            0.0
        };
    }

    /// Store an externally predicted ML difficulty
    pub fn apply_ml_prediction(&mut self, raw: f64) {
        self.raw_ml_difficulty = Some(round_to(raw, 2));
        self.ml_difficulty = round_to(difficulty::scale_ml_difficulty(raw), 1);
    }
}

/// Statistics merged over every episode of a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStats {
    pub episode_count: u64,

    pub total_words: u64,
    pub total_characters: u64,
    pub unique_words: u64,
    pub unique_words_once: u64,
    pub unique_kanji: u64,
    pub unique_kanji_once: u64,

    pub jr_difficulty: f64,
    pub min_jr_difficulty: f64,
    pub max_jr_difficulty: f64,
    pub ml_difficulty: f64,
    pub min_ml_difficulty: f64,
    pub max_ml_difficulty: f64,

    pub duration_seconds: u64,
    pub cpm: f64,
    pub min_cpm: f64,
    pub max_cpm: f64,

    pub jlpt_distribution: JlptDistribution,
    pub pos_distribution: PosDistribution,

    pub general_vocab_stats: Vec<RankCoverage>,
    pub general_vocab_thresholds: Thresholds,
    pub local_vocab_stats: Vec<UniqueCoverage>,
    pub local_vocab_thresholds: Thresholds,

    pub frequency_map: FrequencyMap,
    pub kanji_freq_map: FrequencyMap,

    pub detailed_stats: DetailedStats,
}

/// Compute the statistics of one episode
///
/// Returns `None` when there are no tokens at all. Timing fields are left at
/// zero; see `EpisodeStats::set_timing`.
pub fn compute_episode_stats(
    tokens: &[EnrichedToken],
    raw_text: &str,
    readability: &Readability,
) -> Option<EpisodeStats> {
    if tokens.is_empty() {
        return None;
    }

    let valid: Vec<&EnrichedToken> = tokens.iter().filter(|t| is_valid_token(t)).collect();

    let lexical = lexical::lexical_stats(&valid, tokens);
    let general = coverage::general_coverage(valid.iter().map(|t| WordCount::from(*t)));
    let local = coverage::local_coverage(valid.iter().map(|t| WordCount::from(*t)));
    let (jr_difficulty, raw_jr_difficulty) = difficulty::readability_difficulty(raw_text, readability);

    Some(EpisodeStats {
        total_words: lexical.total_words,
        total_characters: lexical.total_characters,
        unique_words: lexical.unique_words,
        unique_words_once: lexical.unique_words_once,
        unique_kanji: lexical.unique_kanji,
        unique_kanji_once: lexical.unique_kanji_once,
        jr_difficulty,
        raw_jr_difficulty,
        jlpt_distribution: distribution::jlpt_distribution(valid.iter().copied()),
        pos_distribution: distribution::pos_distribution(tokens),
        general_vocab_stats: general.curve,
        general_vocab_thresholds: general.thresholds,
        local_vocab_stats: local.curve,
        local_vocab_thresholds: local.thresholds,
        frequency_map: lexical.frequency_map,
        kanji_freq_map: lexical.kanji_freq_map,
        detailed_stats: lexical::detailed_stats(raw_text),
        ..EpisodeStats::default()
    })
}
