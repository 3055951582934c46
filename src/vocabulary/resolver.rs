use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::language_utils::{is_all_katakana, katakana_to_hiragana};
use crate::stats::FrequencyMap;
use crate::tokenizer::{PartOfSpeech, Token, WordOrigin};
use crate::vocabulary::corpus::{VocabCorpus, VocabEntry};

// @module: Token to dictionary entry resolution

/// Maximum number of secondary matches kept per token
pub const MAX_ALTERNATIVES: usize = 3;

/// Secondary dictionary match sharing the token's lookup key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub word: String,
    pub reading: Option<String>,
    pub meanings: Vec<String>,
    pub jlpt_level: Option<u8>,
}

impl From<&VocabEntry> for Alternative {
    fn from(entry: &VocabEntry) -> Self {
        Self {
            word: entry.word.clone(),
            reading: entry.reading.clone(),
            meanings: entry.meanings.clone(),
            jlpt_level: entry.level,
        }
    }
}

/// Token with its dictionary enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedToken {
    pub surface: String,
    pub base_form: String,
    pub normalized_form: String,
    pub pos: PartOfSpeech,
    #[serde(default)]
    pub origin: WordOrigin,
    pub reading: Option<String>,
    pub meanings: Vec<String>,
    pub jlpt_level: Option<u8>,
    pub frequency_rank: Option<u32>,
    pub kana_frequency_rank: Option<u32>,
    pub alternatives: Vec<Alternative>,
}

impl EnrichedToken {
    /// Token kept verbatim with empty enrichment
    pub fn unresolved(token: Token) -> Self {
        Self {
            surface: token.surface,
            base_form: token.base_form,
            normalized_form: token.normalized_form,
            pos: token.pos,
            origin: token.origin,
            reading: None,
            meanings: Vec::new(),
            jlpt_level: None,
            frequency_rank: None,
            kana_frequency_rank: None,
            alternatives: Vec::new(),
        }
    }

    fn resolved(token: Token, matches: &[&VocabEntry]) -> Self {
        let mut enriched = Self::unresolved(token);
        if let Some((primary, rest)) = matches.split_first() {
            enriched.base_form = primary.word.clone();
            enriched.reading = primary.reading.clone();
            enriched.meanings = primary.meanings.clone();
            enriched.jlpt_level = primary.level;
            enriched.frequency_rank = primary.frequency_rank;
            enriched.kana_frequency_rank = primary.kana_frequency_rank;
            enriched.alternatives = rest
                .iter()
                .take(MAX_ALTERNATIVES)
                .map(|entry| Alternative::from(*entry))
                .collect();
        }
        enriched
    }

    pub fn is_resolved(&self) -> bool {
        self.frequency_rank.is_some() || self.kana_frequency_rank.is_some() || self.reading.is_some()
    }
}

/// A base form with its occurrence count and frequency ranks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedToken {
    pub base_form: String,
    pub count: u64,
    pub frequency_rank: Option<u32>,
    pub kana_frequency_rank: Option<u32>,
}

/// Resolves tokens against a shared corpus
#[derive(Debug, Clone)]
pub struct Resolver {
    corpus: Arc<VocabCorpus>,
}

impl Resolver {
    pub fn new(corpus: Arc<VocabCorpus>) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &VocabCorpus {
        &self.corpus
    }

    /// Resolve a single token
    ///
    /// Lookup order: base form, hiragana of an all-katakana surface, then the
    /// normalized form when it differs from the base form.
    pub fn resolve_token(&self, token: Token) -> EnrichedToken {
        let matches = self.corpus.lookup(&token.base_form);
        if !matches.is_empty() {
            return EnrichedToken::resolved(token, &matches);
        }

        if is_all_katakana(&token.surface) {
            let matches = self.corpus.lookup(&katakana_to_hiragana(&token.surface));
            if !matches.is_empty() {
                return EnrichedToken::resolved(token, &matches);
            }
        }

        if token.normalized_form != token.base_form {
            let matches = self.corpus.lookup(&token.normalized_form);
            if !matches.is_empty() {
                let mut token = token;
                token.base_form = token.normalized_form.clone();
                return EnrichedToken::resolved(token, &matches);
            }
        }

        EnrichedToken::unresolved(token)
    }

    /// Resolve tokens, preserving order and multiplicity
    pub fn resolve(&self, tokens: Vec<Token>) -> Vec<EnrichedToken> {
        tokens.into_iter().map(|t| self.resolve_token(t)).collect()
    }

    /// Attach frequency ranks to pre-aggregated base form counts
    ///
    /// Only an exact headword match supplies ranks; reading matches are
    /// ignored so merged series maps are not re-keyed.
    pub fn resolve_counts(&self, counts: &FrequencyMap) -> Vec<CountedToken> {
        counts
            .iter()
            .map(|(base_form, &count)| {
                let entry = self.corpus.lookup_word(base_form);
                CountedToken {
                    base_form: base_form.clone(),
                    count,
                    frequency_rank: entry.and_then(|e| e.frequency_rank),
                    kana_frequency_rank: entry.and_then(|e| e.kana_frequency_rank),
                }
            })
            .collect()
    }
}
