/*!
 * Common test utilities for the kotoba-stats test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use kotoba_stats::app_config::Config;
use kotoba_stats::tokenizer::mock::MockTokenizer;
use kotoba_stats::tokenizer::{pos, PartOfSpeech, Token, WordOrigin};
use kotoba_stats::vocabulary::{EnrichedToken, VocabCorpus, VocabEntry};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs through env_logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a corpus record
pub fn entry(word: &str, reading: &str, rank: Option<u32>, level: Option<u8>) -> VocabEntry {
    VocabEntry {
        word: word.to_string(),
        reading: Some(reading.to_string()),
        meanings: vec![format!("meaning of {}", word)],
        level,
        frequency_rank: rank,
        kana_frequency_rank: None,
    }
}

/// Small corpus covering the words used by `sample_tokenizer`
pub fn sample_entries() -> Vec<VocabEntry> {
    let mut pera = entry("ぺらぺら", "ぺらぺら", None, None);
    pera.kana_frequency_rank = Some(9000);

    vec![
        entry("猫", "ねこ", Some(1500), Some(5)),
        entry("好き", "すき", Some(300), Some(5)),
        entry("食べる", "たべる", Some(200), Some(5)),
        entry("犬", "いぬ", Some(2500), Some(5)),
        entry("東京", "とうきょう", Some(800), None),
        entry("勉強", "べんきょう", Some(700), Some(5)),
        entry("する", "する", Some(20), Some(5)),
        pera,
        // Homographs sharing the reading はし
        entry("端", "はし", Some(3000), Some(2)),
        entry("箸", "はし", Some(9000), Some(3)),
        entry("嘴", "はし", Some(15000), None),
        entry("梯", "はし", Some(20000), None),
        entry("橋", "はし", None, Some(4)),
    ]
}

pub fn sample_corpus() -> Arc<VocabCorpus> {
    Arc::new(VocabCorpus::from_entries(sample_entries()))
}

/// Writes the sample corpus as JSON and returns its path
pub fn write_sample_corpus(dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&sample_entries())?;
    create_test_file(dir, "vocab.json", &json)
}

/// Adds the lexicon shared by the integration tests to a mock tokenizer
pub fn with_sample_lexicon(tokenizer: MockTokenizer) -> MockTokenizer {
    let word = |surface: &str, base: &str, major: &str, minor: &str, origin: WordOrigin| {
        Token::new(surface, base, PartOfSpeech::new(major, minor)).with_origin(origin)
    };

    tokenizer
        .with_token(word("猫", "猫", pos::NOUN, "普通名詞", WordOrigin::Wago))
        .with_token(word("犬", "犬", pos::NOUN, "普通名詞", WordOrigin::Wago))
        .with_token(word("東京", "東京", pos::NOUN, pos::PROPER_NOUN, WordOrigin::Proper))
        .with_token(word("勉強", "勉強", pos::NOUN, "普通名詞", WordOrigin::Kango))
        .with_token(word("好き", "好き", pos::ADJECTIVAL_NOUN, "一般", WordOrigin::Wago))
        .with_token(word("食べ", "食べる", pos::VERB, "一般", WordOrigin::Wago))
        .with_token(word("する", "する", pos::VERB, "非自立可能", WordOrigin::Wago))
        .with_token(word("ペラペラ", "ペラペラ", "副詞", "*", WordOrigin::Wago))
        .with_token(word("が", "が", pos::PARTICLE, "格助詞", WordOrigin::Wago))
        .with_token(word("で", "で", pos::PARTICLE, "格助詞", WordOrigin::Wago))
        .with_token(word("です", "です", pos::AUXILIARY_VERB, "*", WordOrigin::Wago))
        .with_token(word("ます", "ます", pos::AUXILIARY_VERB, "*", WordOrigin::Wago))
}

/// Working mock tokenizer that knows the sample lexicon
pub fn sample_tokenizer() -> MockTokenizer {
    with_sample_lexicon(MockTokenizer::working())
}

/// Enriched token with the given POS and ranks, no other enrichment
pub fn enriched(
    base_form: &str,
    major: &str,
    minor: &str,
    frequency_rank: Option<u32>,
    jlpt_level: Option<u8>,
) -> EnrichedToken {
    let mut token = EnrichedToken::unresolved(Token::new(base_form, base_form, PartOfSpeech::new(major, minor)));
    token.frequency_rank = frequency_rank;
    token.jlpt_level = jlpt_level;
    token
}

/// Enriched common noun with a frequency rank
pub fn noun(base_form: &str, frequency_rank: Option<u32>) -> EnrichedToken {
    enriched(base_form, pos::NOUN, "普通名詞", frequency_rank, None)
}

/// Configuration tuned for tests: two workers, no readability scorer
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.batch.workers = 2;
    config.readability.enabled = false;
    config
}

/// First episode of the sample series
pub const EPISODE_ONE_SRT: &str = "1
00:00:00,000 --> 00:00:01,000
猫が好きです

2
00:00:01,200 --> 00:00:02,500
犬が好きです

3
00:00:04,000 --> 00:00:05,000
東京で勉強する
";

/// Second episode of the sample series, as ASS
pub const EPISODE_TWO_ASS: &str = "[Script Info]
Title: sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize
Style: Default,Arial,20

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,{\\i1}猫が食べます{\\i0}
Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,これは数えない
Dialogue: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,{\\p1}m 0 0 l 100 0 100 100{\\p0}
Dialogue: 0,0:00:05.00,0:00:06.50,Default,,0,0,0,,ペラペラ、好き！
";

/// Episode whose dialogue is entirely filtered out
pub const EMPTY_EPISODE_SRT: &str = "1
00:00:00,000 --> 00:00:01,000
123

2
00:00:02,000 --> 00:00:03,000
（拍手）
";
