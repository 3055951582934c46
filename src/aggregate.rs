/*!
 * Series aggregation.
 *
 * A series record is a fold over immutable episode records. Counts and
 * maps add up, difficulty and speed are averaged over the episodes that
 * report them, and coverage curves are recomputed from the merged
 * vocabulary because per-episode curves cannot be added.
 */

use std::collections::BTreeMap;

use crate::stats::coverage::{general_coverage, local_coverage};
use crate::stats::lexical::unique_counts;
use crate::stats::{round_to, DetailedStats, EpisodeStats, FrequencyMap, SeriesStats, WordCount};
use crate::vocabulary::CountedToken;

/// Key-wise sum of maps
pub fn merge_counts<'a, K>(maps: impl IntoIterator<Item = &'a BTreeMap<K, u64>>) -> BTreeMap<K, u64>
where
    K: Ord + Clone + 'a,
{
    let mut merged = BTreeMap::new();
    for map in maps {
        for (key, count) in map {
            *merged.entry(key.clone()).or_default() += count;
        }
    }
    merged
}

/// Merge the word frequency maps of several episodes
pub fn merge_frequency_maps<'a>(episodes: impl IntoIterator<Item = &'a EpisodeStats>) -> FrequencyMap {
    merge_counts(episodes.into_iter().map(|e| &e.frequency_map))
}

/// Mean, minimum and maximum over positive values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PositiveSummary {
    mean: f64,
    min: f64,
    max: f64,
}

impl PositiveSummary {
    fn over(values: impl IntoIterator<Item = f64>, decimals: usize) -> Self {
        let positive: Vec<f64> = values.into_iter().filter(|v| *v > 0.0).collect();
        if positive.is_empty() {
            return Self::default();
        }
        let sum: f64 = positive.iter().sum();
        Self {
            mean: round_to(sum / positive.len() as f64, decimals),
            min: positive.iter().copied().fold(f64::INFINITY, f64::min),
            max: positive.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

fn merge_detailed(episodes: &[EpisodeStats]) -> DetailedStats {
    let lengths: Vec<f64> = episodes
        .iter()
        .filter_map(|e| e.detailed_stats.average_sentence_length)
        .collect();
    if lengths.is_empty() {
        return DetailedStats::default();
    }

    let sentence_count = episodes
        .iter()
        .filter_map(|e| e.detailed_stats.sentence_count)
        .sum();

    DetailedStats {
        average_sentence_length: Some(round_to(lengths.iter().sum::<f64>() / lengths.len() as f64, 1)),
        sentence_count: Some(sentence_count),
    }
}

/// Combine episode statistics into series statistics
///
/// `vocabulary` is the merged word list with corpus ranks attached (see
/// `Resolver::resolve_counts`); both coverage curves are rebuilt from it.
/// Returns `None` for an empty series.
pub fn aggregate_series(episodes: &[EpisodeStats], vocabulary: &[CountedToken]) -> Option<SeriesStats> {
    if episodes.is_empty() {
        return None;
    }

    let frequency_map = merge_frequency_maps(episodes);
    let kanji_freq_map = merge_counts(episodes.iter().map(|e| &e.kanji_freq_map));
    let (unique_words, unique_words_once) = unique_counts(&frequency_map);
    let (unique_kanji, unique_kanji_once) = unique_counts(&kanji_freq_map);

    let jr = PositiveSummary::over(episodes.iter().map(|e| e.jr_difficulty), 2);
    let ml = PositiveSummary::over(episodes.iter().map(|e| e.ml_difficulty), 2);
    let cpm = PositiveSummary::over(episodes.iter().map(|e| e.cpm), 1);

    let general = general_coverage(vocabulary.iter().map(WordCount::from));
    let local = local_coverage(vocabulary.iter().map(WordCount::from));

    Some(SeriesStats {
        episode_count: episodes.len() as u64,
        total_words: episodes.iter().map(|e| e.total_words).sum(),
        total_characters: episodes.iter().map(|e| e.total_characters).sum(),
        unique_words,
        unique_words_once,
        unique_kanji,
        unique_kanji_once,
        jr_difficulty: jr.mean,
        min_jr_difficulty: jr.min,
        max_jr_difficulty: jr.max,
        ml_difficulty: ml.mean,
        min_ml_difficulty: ml.min,
        max_ml_difficulty: ml.max,
        duration_seconds: episodes.iter().map(|e| e.duration_seconds).sum(),
        cpm: cpm.mean,
        min_cpm: cpm.min,
        max_cpm: cpm.max,
        jlpt_distribution: merge_counts(episodes.iter().map(|e| &e.jlpt_distribution)),
        pos_distribution: merge_counts(episodes.iter().map(|e| &e.pos_distribution)),
        general_vocab_stats: general.curve,
        general_vocab_thresholds: general.thresholds,
        local_vocab_stats: local.curve,
        local_vocab_thresholds: local.thresholds,
        frequency_map,
        kanji_freq_map,
        detailed_stats: merge_detailed(episodes),
    })
}
