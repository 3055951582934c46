/*!
 * Vocabulary coverage curves.
 *
 * Two views of "how much of this text do I understand if I know N words":
 * - general coverage ranks words by a corpus-wide frequency list
 * - local coverage ranks words by how often they occur in the work itself
 *
 * Both accept per-occurrence tokens or pre-aggregated counts through
 * `WordCount`, so series statistics are recomputed with the same code.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::stats::round_to;
use crate::vocabulary::{CountedToken, EnrichedToken};

/// Ranks above this are treated as outliers
pub const GENERAL_RANK_CEILING: u32 = 30_000;

/// Distance between general curve checkpoints
pub const GENERAL_CHECKPOINT_STEP: u32 = 1_000;

/// Smallest reported general threshold
pub const GENERAL_THRESHOLD_FLOOR: u32 = 500;

pub const GENERAL_TARGETS: [u8; 7] = [50, 70, 80, 90, 95, 97, 99];
pub const LOCAL_TARGETS: [u8; 7] = [80, 85, 90, 95, 97, 98, 99];

/// Upper bound on local curve points, excluding the final one
const LOCAL_CURVE_POINTS: usize = 100;

/// Target coverage percentage to required vocabulary size
pub type Thresholds = BTreeMap<u8, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankCoverage {
    pub rank: u32,
    pub coverage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniqueCoverage {
    pub unique: u64,
    pub coverage: f64,
}

/// Occurrences of one word together with its corpus ranks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordCount<'a> {
    pub base_form: &'a str,
    pub count: u64,
    pub frequency_rank: Option<u32>,
    pub kana_frequency_rank: Option<u32>,
}

impl WordCount<'_> {
    /// The better of the written-form and kana-form ranks
    pub fn effective_rank(&self) -> Option<u32> {
        match (self.frequency_rank, self.kana_frequency_rank) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (rank, None) | (None, rank) => rank,
        }
    }
}

impl<'a> From<&'a EnrichedToken> for WordCount<'a> {
    fn from(token: &'a EnrichedToken) -> Self {
        Self {
            base_form: &token.base_form,
            count: 1,
            frequency_rank: token.frequency_rank,
            kana_frequency_rank: token.kana_frequency_rank,
        }
    }
}

impl<'a> From<&'a CountedToken> for WordCount<'a> {
    fn from(token: &'a CountedToken) -> Self {
        Self {
            base_form: &token.base_form,
            count: token.count,
            frequency_rank: token.frequency_rank,
            kana_frequency_rank: token.kana_frequency_rank,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralCoverage {
    pub curve: Vec<RankCoverage>,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalCoverage {
    pub curve: Vec<UniqueCoverage>,
    pub thresholds: Thresholds,
}

/// Whether `covered` reaches `target` percent of `total`, in exact arithmetic
fn reaches(covered: u64, total: u64, target: u8) -> bool {
    covered as u128 * 100 >= total as u128 * target as u128
}

fn percentage(covered: u64, total: u64) -> f64 {
    round_to(covered as f64 / total as f64 * 100.0, 2)
}

/// Round to the nearest hundred, ties to even hundreds
pub fn round_to_hundred(value: u32) -> u32 {
    let (hundreds, rest) = (value / 100, value % 100);
    let rounded = if rest > 50 || (rest == 50 && hundreds % 2 == 1) {
        hundreds + 1
    } else {
        hundreds
    };
    rounded * 100
}

/// Coverage by corpus-wide frequency rank
///
/// Words without a usable rank (missing, zero or above the ceiling) are
/// left out of both the numerator and the total.
pub fn general_coverage<'a>(words: impl IntoIterator<Item = WordCount<'a>>) -> GeneralCoverage {
    let mut rank_counts: BTreeMap<u32, u64> = BTreeMap::new();
    for word in words {
        if let Some(rank) = word.effective_rank() {
            if rank > 0 && rank <= GENERAL_RANK_CEILING {
                *rank_counts.entry(rank).or_default() += word.count;
            }
        }
    }

    let total: u64 = rank_counts.values().sum();
    if total == 0 {
        return GeneralCoverage::default();
    }

    let mut cumulative = Vec::with_capacity(rank_counts.len());
    let mut running = 0u64;
    for (&rank, &count) in &rank_counts {
        running += count;
        cumulative.push((rank, running));
    }

    let mut curve = Vec::new();
    let mut idx = 0;
    let mut covered = 0u64;
    for checkpoint in (GENERAL_CHECKPOINT_STEP..=GENERAL_RANK_CEILING).step_by(GENERAL_CHECKPOINT_STEP as usize) {
        while idx < cumulative.len() && cumulative[idx].0 <= checkpoint {
            covered = cumulative[idx].1;
            idx += 1;
        }
        curve.push(RankCoverage {
            rank: checkpoint,
            coverage: percentage(covered, total),
        });
    }

    let thresholds = GENERAL_TARGETS
        .iter()
        .map(|&target| {
            let rank = cumulative
                .iter()
                .find(|(_, running)| reaches(*running, total, target))
                .map_or(0, |(rank, _)| *rank);
            (target, round_to_hundred(rank).max(GENERAL_THRESHOLD_FLOOR) as u64)
        })
        .collect();

    GeneralCoverage { curve, thresholds }
}

/// Coverage by in-work frequency
///
/// Words are ordered by count, most frequent first, ties in order of first
/// appearance. Placeholder base forms are ignored.
pub fn local_coverage<'a>(words: impl IntoIterator<Item = WordCount<'a>>) -> LocalCoverage {
    let mut order: Vec<(&str, u64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for word in words {
        if word.base_form.is_empty() || word.base_form == "*" {
            continue;
        }
        match positions.get(word.base_form) {
            Some(&pos) => order[pos].1 += word.count,
            None => {
                positions.insert(word.base_form, order.len());
                order.push((word.base_form, word.count));
            }
        }
    }

    let total: u64 = order.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return LocalCoverage::default();
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let step = (order.len() / LOCAL_CURVE_POINTS).max(1);
    let last = order.len() - 1;
    let mut curve = Vec::new();
    let mut thresholds = Thresholds::new();
    let mut running = 0u64;

    for (i, (_, count)) in order.iter().enumerate() {
        running += count;
        let unique = (i + 1) as u64;

        for &target in &LOCAL_TARGETS {
            if !thresholds.contains_key(&target) && reaches(running, total, target) {
                thresholds.insert(target, unique);
            }
        }

        if i % step == 0 || i == last {
            curve.push(UniqueCoverage {
                unique,
                coverage: percentage(running, total),
            });
        }
    }

    for target in LOCAL_TARGETS {
        thresholds.entry(target).or_insert(order.len() as u64);
    }

    LocalCoverage { curve, thresholds }
}
