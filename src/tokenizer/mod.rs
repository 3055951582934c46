/*!
 * Morphological analysis.
 *
 * This module defines the token model shared by the rest of the pipeline
 * and the `Tokenizer` trait that analyzer backends implement:
 * - `vibrato`: dictionary-backed analyzer (cargo feature `vibrato`)
 * - `mock`: scripted analyzer for tests and benchmarks
 *
 * Backends are wrapped by the `gateway`, which enforces the input size
 * limit and turns backend failures into empty results.
 */

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::TokenizerError;

pub mod features;
pub mod gateway;
pub mod mock;
#[cfg(feature = "vibrato")]
pub mod vibrato;

pub use gateway::TokenizerGateway;

/// Upper bound on bytes per analyzer call unless a backend says otherwise
pub const DEFAULT_MAX_INPUT_BYTES: usize = 40_000;

/// Part-of-speech labels as emitted by UniDic and IPADIC
pub mod pos {
    pub const NOUN: &str = "名詞";
    pub const PROPER_NOUN: &str = "固有名詞";
    pub const NUMERAL: &str = "数詞";
    pub const VERB: &str = "動詞";
    pub const ADJECTIVE: &str = "形容詞";
    pub const ADJECTIVAL_NOUN: &str = "形状詞";
    pub const PARTICLE: &str = "助詞";
    pub const AUXILIARY_VERB: &str = "助動詞";
    pub const CONJUNCTION: &str = "接続詞";
    pub const INTERJECTION: &str = "感動詞";
    pub const SUPPLEMENTARY_SYMBOL: &str = "補助記号";
    pub const SYMBOL: &str = "記号";
    pub const WHITESPACE: &str = "空白";
}

/// Coarse and fine part-of-speech categories of a token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PartOfSpeech {
    pub major: String,
    pub minor: String,
}

impl PartOfSpeech {
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            minor: minor.into(),
        }
    }

    /// Punctuation, symbols and whitespace
    pub fn is_symbol(&self) -> bool {
        matches!(
            self.major.as_str(),
            pos::SUPPLEMENTARY_SYMBOL | pos::SYMBOL | pos::WHITESPACE
        )
    }
}

/// Word-origin class (goshu) reported by UniDic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordOrigin {
    /// Sino-Japanese vocabulary (漢)
    Kango,
    /// Native Japanese vocabulary (和)
    Wago,
    /// Loanwords (外)
    Foreign,
    /// Hybrid words (混)
    Mixed,
    /// Proper names (固)
    Proper,
    /// Symbols (記号)
    Symbol,
    #[default]
    Unknown,
}

impl WordOrigin {
    pub fn from_goshu(goshu: &str) -> Self {
        match goshu {
            "漢" => Self::Kango,
            "和" => Self::Wago,
            "外" => Self::Foreign,
            "混" => Self::Mixed,
            "固" => Self::Proper,
            "記号" => Self::Symbol,
            _ => Self::Unknown,
        }
    }
}

/// One morpheme produced by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Text exactly as it appeared
    pub surface: String,
    /// Dictionary (lemma) form
    pub base_form: String,
    /// Orthographically normalized form, used as a lookup fallback
    pub normalized_form: String,
    pub pos: PartOfSpeech,
    #[serde(default)]
    pub origin: WordOrigin,
}

impl Token {
    pub fn new(surface: impl Into<String>, base_form: impl Into<String>, pos: PartOfSpeech) -> Self {
        let base_form = base_form.into();
        Self {
            surface: surface.into(),
            normalized_form: base_form.clone(),
            base_form,
            pos,
            origin: WordOrigin::Unknown,
        }
    }

    pub fn with_normalized(mut self, normalized_form: impl Into<String>) -> Self {
        self.normalized_form = normalized_form.into();
        self
    }

    pub fn with_origin(mut self, origin: WordOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Common trait for all morphological analyzers
///
/// Implementations must be safe to share across worker threads; the batch
/// controller hands one instance to every episode.
pub trait Tokenizer: Send + Sync + Debug {
    /// Analyze one chunk of text
    ///
    /// # Arguments
    /// * `text` - Input no larger than `max_input_bytes()`
    ///
    /// # Returns
    /// * `Result<Vec<Token>, TokenizerError>` - Tokens in text order, or an error
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError>;

    /// Largest input in UTF-8 bytes accepted per call
    fn max_input_bytes(&self) -> usize {
        DEFAULT_MAX_INPUT_BYTES
    }

    /// Backend name for logging
    fn name(&self) -> &str;
}
