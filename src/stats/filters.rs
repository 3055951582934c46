use crate::language_utils::is_non_word;
use crate::tokenizer::pos;
use crate::vocabulary::EnrichedToken;

// @module: Token validity filter for vocabulary statistics

/// Grammar words excluded from vocabulary counts
const GRAMMAR_POS: [&str; 3] = [pos::PARTICLE, pos::AUXILIARY_VERB, pos::INTERJECTION];

/// Placeholder base form emitted for unknown words
const UNSET_BASE: &str = "*";

/// Whether a token counts as a vocabulary word
///
/// Rejects punctuation, symbols and whitespace, grammar words, numerals,
/// placeholder or non-Japanese base forms, and tokens without any frequency
/// rank.
pub fn is_valid_token(token: &EnrichedToken) -> bool {
    if token.pos.is_symbol() || GRAMMAR_POS.contains(&token.pos.major.as_str()) {
        return false;
    }

    if token.pos.minor == pos::NUMERAL {
        return false;
    }

    let base = token.base_form.as_str();
    if base.is_empty() || base == UNSET_BASE || is_non_word(base) {
        return false;
    }

    token.frequency_rank.is_some() || token.kana_frequency_rank.is_some()
}
