/*!
 * Tests for general and local vocabulary coverage
 */

use kotoba_stats::stats::coverage::{
    general_coverage, local_coverage, GENERAL_RANK_CEILING, GENERAL_TARGETS, LOCAL_TARGETS,
};
use kotoba_stats::stats::WordCount;
use kotoba_stats::vocabulary::{CountedToken, EnrichedToken};
use crate::common::noun;

fn words(tokens: &[EnrichedToken]) -> impl Iterator<Item = WordCount<'_>> {
    tokens.iter().map(WordCount::from)
}

#[test]
fn test_general_coverage_withRankedTokens_shouldBuildCurveAndThresholds() {
    let tokens = vec![
        noun("a", Some(500)),
        noun("b", Some(1500)),
        noun("b", Some(1500)),
        noun("c", Some(25_000)),
        noun("d", Some(40_000)),
    ];
    let coverage = general_coverage(words(&tokens));

    // The rank above the ceiling is ignored; total is 4
    assert_eq!(coverage.curve.len(), (GENERAL_RANK_CEILING / 1000) as usize);
    assert_eq!(coverage.curve[0].rank, 1000);
    assert_eq!(coverage.curve[0].coverage, 25.0);
    assert_eq!(coverage.curve[1].coverage, 75.0);
    assert_eq!(coverage.curve[23].coverage, 75.0);
    assert_eq!(coverage.curve[24].coverage, 100.0);

    assert_eq!(coverage.thresholds[&50], 1500);
    assert_eq!(coverage.thresholds[&70], 1500);
    assert_eq!(coverage.thresholds[&80], 25_000);
    assert_eq!(coverage.thresholds[&99], 25_000);
    assert_eq!(coverage.thresholds.len(), GENERAL_TARGETS.len());
}

#[test]
fn test_general_coverage_withLowRanks_shouldFloorThresholdsAt500() {
    let tokens = vec![noun("a", Some(20)), noun("b", Some(120))];
    let coverage = general_coverage(words(&tokens));

    assert!(coverage.thresholds.values().all(|&rank| rank == 500));
}

#[test]
fn test_general_coverage_withKanaOnlyRank_shouldUseKanaRank() {
    let mut kana = noun("ぺらぺら", None);
    kana.kana_frequency_rank = Some(700);
    let coverage = general_coverage(words(std::slice::from_ref(&kana)));

    assert_eq!(coverage.curve[0].coverage, 100.0);
    assert_eq!(coverage.thresholds[&50], 700);
}

#[test]
fn test_general_coverage_withoutRankedWords_shouldBeEmpty() {
    let tokens = vec![noun("a", None), noun("b", Some(0)), noun("c", Some(31_000))];
    let coverage = general_coverage(words(&tokens));

    assert!(coverage.curve.is_empty());
    assert!(coverage.thresholds.is_empty());
}

/// 1 of 800 is exactly half way at two decimals and rounds to even
#[test]
fn test_general_coverage_withTiedPercentage_shouldRoundHalfToEven() {
    let mut tokens = vec![noun("a", Some(500))];
    tokens.extend((0..799).map(|_| noun("b", Some(5000))));
    let coverage = general_coverage(words(&tokens));

    assert_eq!(coverage.curve[0].coverage, 0.12);
    assert_eq!(coverage.curve[4].coverage, 100.0);
}

#[test]
fn test_general_coverage_withAnyInput_shouldBeMonotonic() {
    let tokens: Vec<EnrichedToken> = (1..=200u32)
        .map(|i| noun(&format!("w{}", i % 37), Some((i * 7919) % 29_000 + 1)))
        .collect();
    let coverage = general_coverage(words(&tokens));

    for pair in coverage.curve.windows(2) {
        assert!(pair[0].coverage <= pair[1].coverage);
    }
    let thresholds: Vec<u64> = GENERAL_TARGETS.iter().map(|t| coverage.thresholds[t]).collect();
    assert!(thresholds.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(coverage.curve.iter().all(|p| (0.0..=100.0).contains(&p.coverage)));
}

#[test]
fn test_local_coverage_withTiedCounts_shouldKeepFirstAppearanceOrder() {
    let tokens = vec![
        noun("a", Some(1)),
        noun("b", Some(1)),
        noun("a", Some(1)),
        noun("c", Some(1)),
        noun("a", Some(1)),
    ];
    let coverage = local_coverage(words(&tokens));

    let points: Vec<(u64, f64)> = coverage.curve.iter().map(|p| (p.unique, p.coverage)).collect();
    assert_eq!(points, vec![(1, 60.0), (2, 80.0), (3, 100.0)]);
    assert_eq!(coverage.thresholds[&80], 2);
    assert_eq!(coverage.thresholds[&85], 3);
    assert_eq!(coverage.thresholds[&99], 3);
}

#[test]
fn test_local_coverage_withSingleWord_shouldNeedOneWordForEveryTarget() {
    let tokens = vec![noun("猫", Some(1500)), noun("猫", Some(1500))];
    let coverage = local_coverage(words(&tokens));

    assert_eq!(coverage.curve.len(), 1);
    assert_eq!(coverage.curve[0].coverage, 100.0);
    for target in LOCAL_TARGETS {
        assert_eq!(coverage.thresholds[&target], 1);
    }
}

#[test]
fn test_local_coverage_withManyWords_shouldDownsampleCurve() {
    let tokens: Vec<EnrichedToken> = (0..250).map(|i| noun(&format!("w{}", i), Some(100))).collect();
    let coverage = local_coverage(words(&tokens));

    // Step of 2 over 250 words plus the final point
    assert_eq!(coverage.curve.len(), 126);
    assert_eq!(coverage.curve.last().map(|p| p.unique), Some(250));
    assert_eq!(coverage.curve.last().map(|p| p.coverage), Some(100.0));
    assert!(coverage.curve.windows(2).all(|pair| pair[0].unique < pair[1].unique));
}

#[test]
fn test_local_coverage_withPlaceholderBase_shouldIgnoreIt() {
    let tokens = vec![noun("*", Some(1)), noun("猫", Some(1))];
    let coverage = local_coverage(words(&tokens));

    assert_eq!(coverage.curve.len(), 1);
    assert_eq!(coverage.curve[0].unique, 1);
}

#[test]
fn test_coverage_withCountedTokens_shouldMatchPerOccurrenceTokens() {
    let tokens = vec![
        noun("a", Some(300)),
        noun("a", Some(300)),
        noun("b", Some(4200)),
    ];
    let counted = vec![
        CountedToken {
            base_form: "a".to_string(),
            count: 2,
            frequency_rank: Some(300),
            kana_frequency_rank: None,
        },
        CountedToken {
            base_form: "b".to_string(),
            count: 1,
            frequency_rank: Some(4200),
            kana_frequency_rank: None,
        },
    ];

    assert_eq!(
        general_coverage(words(&tokens)),
        general_coverage(counted.iter().map(WordCount::from))
    );
    assert_eq!(
        local_coverage(words(&tokens)),
        local_coverage(counted.iter().map(WordCount::from))
    );
}
