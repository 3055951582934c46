/*!
 * Tests for per-episode statistics
 */

use std::sync::Arc;
use anyhow::{anyhow, Result};
use kotoba_stats::language_utils::DrawingCommandDetector;
use kotoba_stats::stats::difficulty::readability_difficulty;
use kotoba_stats::stats::lexical::{detailed_stats, sentence_count};
use kotoba_stats::stats::{
    compute_episode_stats, is_valid_token, EpisodeMeta, EpisodeStats, JReadabilityScorer, JlptLevel,
    PosCategory, Readability, ReadabilityScorer, round_to,
};
use kotoba_stats::tokenizer::{pos, TokenizerGateway, DEFAULT_MAX_INPUT_BYTES};
use kotoba_stats::vocabulary::EnrichedToken;
use crate::common::{self, enriched, noun};

/// Scorer returning a fixed raw score
#[derive(Debug)]
struct FixedScorer(f64);

impl ReadabilityScorer for FixedScorer {
    fn score(&self, _text: &str) -> Result<f64> {
        Ok(self.0)
    }
}

/// Scorer that always fails
#[derive(Debug)]
struct BrokenScorer;

impl ReadabilityScorer for BrokenScorer {
    fn score(&self, _text: &str) -> Result<f64> {
        Err(anyhow!("model missing"))
    }
}

fn sample_tokens() -> Vec<EnrichedToken> {
    vec![
        enriched("猫", pos::NOUN, "普通名詞", Some(1500), Some(5)),
        enriched("が", pos::PARTICLE, "格助詞", None, None),
        enriched("猫", pos::NOUN, "普通名詞", Some(1500), Some(5)),
        enriched("三", pos::NOUN, pos::NUMERAL, Some(100), None),
        noun("abc", Some(50)),
        enriched("東京", pos::NOUN, pos::PROPER_NOUN, Some(800), None),
        enriched("。", pos::SUPPLEMENTARY_SYMBOL, "句点", None, None),
        noun("謎", None),
    ]
}

#[test]
fn test_is_valid_token_withVariousTokens_shouldFilterNonVocabulary() {
    let tokens = sample_tokens();
    let valid: Vec<&str> = tokens
        .iter()
        .filter(|t| is_valid_token(t))
        .map(|t| t.base_form.as_str())
        .collect();
    assert_eq!(valid, vec!["猫", "猫", "東京"]);

    // A kana-only rank is enough
    let mut kana_only = noun("ぺらぺら", None);
    kana_only.kana_frequency_rank = Some(9000);
    assert!(is_valid_token(&kana_only));

    assert!(!is_valid_token(&noun("*", Some(10))));
    assert!(!is_valid_token(&enriched("あ", pos::INTERJECTION, "*", Some(10), None)));
}

#[test]
fn test_compute_episode_stats_withMixedTokens_shouldCountCorrectly() {
    let stats = compute_episode_stats(&sample_tokens(), "猫が猫。\n", &Readability::Unavailable).unwrap();

    assert_eq!(stats.total_words, 3);
    assert_eq!(stats.total_characters, 11);
    assert_eq!(stats.frequency_map.get("猫"), Some(&2));
    assert_eq!(stats.frequency_map.get("東京"), Some(&1));
    assert_eq!((stats.unique_words, stats.unique_words_once), (2, 1));

    // Kanji are counted over every token, valid or not
    assert_eq!(stats.kanji_freq_map.get("猫"), Some(&2));
    assert_eq!(stats.kanji_freq_map.get("三"), Some(&1));
    assert_eq!((stats.unique_kanji, stats.unique_kanji_once), (5, 4));

    assert_eq!(stats.pos_distribution[&PosCategory::Nouns], 5);
    assert_eq!(stats.pos_distribution[&PosCategory::ProperNouns], 1);
    assert_eq!(stats.pos_distribution[&PosCategory::Particles], 1);
    assert_eq!(stats.pos_distribution[&PosCategory::Others], 1);
    assert_eq!(stats.pos_distribution[&PosCategory::Verbs], 0);

    assert_eq!(stats.jlpt_distribution[&JlptLevel::N5], 2);
    assert_eq!(stats.jlpt_distribution[&JlptLevel::N1], 0);

    assert_eq!(stats.jr_difficulty, 0.0);
    assert_eq!(stats.detailed_stats.sentence_count, Some(1));
    assert_eq!(stats.detailed_stats.average_sentence_length, Some(5.0));
    assert_eq!(stats.cpm, 0.0);
    assert!(stats.meta.is_none());
}

#[test]
fn test_compute_episode_stats_withNoTokens_shouldReturnNone() {
    assert!(compute_episode_stats(&[], "", &Readability::Unavailable).is_none());
}

#[test]
fn test_compute_episode_stats_withOnlyInvalidTokens_shouldStillProduceRecord() {
    let tokens = vec![enriched("。", pos::SUPPLEMENTARY_SYMBOL, "句点", None, None)];
    let stats = compute_episode_stats(&tokens, "。\n", &Readability::Unavailable).unwrap();

    assert_eq!(stats.total_words, 0);
    assert!(stats.general_vocab_stats.is_empty());
    assert!(stats.general_vocab_thresholds.is_empty());
    assert!(stats.local_vocab_stats.is_empty());
}

#[test]
fn test_unique_counts_withAnyTokens_shouldRespectOrdering() {
    let stats = compute_episode_stats(&sample_tokens(), "猫", &Readability::Unavailable).unwrap();
    assert!(stats.unique_words_once <= stats.unique_words);
    assert!(stats.unique_words <= stats.total_words);
    assert!(stats.unique_kanji_once <= stats.unique_kanji);
}

#[test]
fn test_readability_difficulty_withScorerStates_shouldDegradeToZero() {
    let text = "猫が好き。";

    let fixed = Readability::Available(Arc::new(FixedScorer(5.5)));
    assert_eq!(readability_difficulty(text, &fixed), (2.5, 5.5));
    assert_eq!(readability_difficulty("", &fixed), (0.0, 0.0));

    let broken = Readability::Available(Arc::new(BrokenScorer));
    assert_eq!(readability_difficulty(text, &broken), (0.0, 0.0));

    let nan = Readability::Available(Arc::new(FixedScorer(f64::NAN)));
    assert_eq!(readability_difficulty(text, &nan), (0.0, 0.0));

    assert_eq!(readability_difficulty(text, &Readability::Unavailable), (0.0, 0.0));
}

#[test]
fn test_jreadability_scorer_withSampleText_shouldScoreWithinScale() -> Result<()> {
    let gateway = TokenizerGateway::new(
        Arc::new(common::sample_tokenizer()),
        DEFAULT_MAX_INPUT_BYTES,
        DrawingCommandDetector::default(),
    );
    let scorer = JReadabilityScorer::new(gateway);

    let raw = scorer.score("猫が好きです。\n東京で勉強する。\n")?;
    assert!(raw.is_finite());

    let readability = Readability::Available(Arc::new(scorer));
    let (scaled, _) = readability_difficulty("猫が好きです。", &readability);
    assert!((1.0..=10.0).contains(&scaled));

    assert!(readability_difficulty("。。。", &readability) == (0.0, 0.0));
    Ok(())
}

#[test]
fn test_detailed_stats_withVariousTexts_shouldCountSentences() {
    // 12 characters including newlines, two terminators
    let stats = detailed_stats("猫が好き。\n犬も好き！\n");
    assert_eq!(stats.sentence_count, Some(2));
    assert_eq!(stats.average_sentence_length, Some(6.0));

    // No terminator still counts as one sentence
    assert_eq!(sentence_count("ねこ"), 1);
    assert_eq!(detailed_stats("ねこ").average_sentence_length, Some(2.0));

    let empty = detailed_stats("");
    assert_eq!(empty.sentence_count, None);
    assert_eq!(empty.average_sentence_length, None);
}

#[test]
fn test_set_timing_withActiveTime_shouldComputeCharactersPerMinute() {
    let mut stats = EpisodeStats {
        total_characters: 120,
        ..EpisodeStats::default()
    };

    stats.set_timing(60.0, 90);
    assert_eq!(stats.cpm, 120.0);
    assert_eq!(stats.duration_seconds, 90);

    stats.set_timing(0.0, 0);
    assert_eq!(stats.cpm, 0.0);
}

#[test]
fn test_round_to_withBinaryTies_shouldRoundHalfToEven() {
    assert_eq!(round_to(0.125, 2), 0.12);
    assert_eq!(round_to(0.375, 2), 0.38);
    assert_eq!(round_to(0.25, 1), 0.2);
    assert_eq!(round_to(11.75, 1), 11.8);
    // Stored just below the written value
    assert_eq!(round_to(2.675, 2), 2.67);
    assert_eq!(round_to(381.818, 1), 381.8);
    assert_eq!(round_to(-1.25, 1), -1.2);
}

#[test]
fn test_apply_ml_prediction_withRawScore_shouldScaleAndRound() {
    let mut stats = EpisodeStats::default();
    stats.apply_ml_prediction(30.0);

    assert_eq!(stats.raw_ml_difficulty, Some(30.0));
    assert_eq!(stats.ml_difficulty, 7.3);

    stats.apply_ml_prediction(50.0);
    assert_eq!(stats.ml_difficulty, 10.0);
}

#[test]
fn test_episode_stats_serialization_shouldUseFrontEndKeys() -> Result<()> {
    let mut stats = compute_episode_stats(&sample_tokens(), "猫が猫。\n", &Readability::Unavailable)
        .ok_or_else(|| anyhow!("no stats"))?;
    let json = serde_json::to_value(&stats)?;

    assert!(json.get("_meta").is_none());
    assert!(json.get("raw_ml_difficulty").is_none());
    assert_eq!(json["pos_distribution"]["Proper Nouns"], 1);
    assert_eq!(json["jlpt_distribution"]["N5"], 2);
    assert!(json["general_vocab_thresholds"].get("50").is_some());
    assert_eq!(json["general_vocab_stats"][0]["rank"], 1000);

    stats.meta = Some(EpisodeMeta {
        episode_number: 3,
        series_title: "猫の日常".to_string(),
        filename: "3.srt".to_string(),
    });
    let json = serde_json::to_value(&stats)?;
    assert_eq!(json["_meta"]["episode_number"], 3);
    assert_eq!(json["_meta"]["filename"], "3.srt");
    Ok(())
}

#[test]
fn test_episode_stats_deserialize_withPartialRecord_shouldDefaultMissingFields() -> Result<()> {
    let stats: EpisodeStats = serde_json::from_str(r#"{"total_words": 10, "raw_ml_difficulty": 27.5}"#)?;

    assert_eq!(stats.total_words, 10);
    assert_eq!(stats.raw_ml_difficulty, Some(27.5));
    assert_eq!(stats.ml_difficulty, 0.0);
    assert!(stats.frequency_map.is_empty());
    Ok(())
}
