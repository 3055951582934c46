/*!
 * Part-of-speech and JLPT level distributions.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tokenizer::pos;
use crate::vocabulary::EnrichedToken;

/// Grammatical bucket used for the POS distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PosCategory {
    Nouns,
    #[serde(rename = "Proper Nouns")]
    ProperNouns,
    Verbs,
    Adjectives,
    Particles,
    Auxiliary,
    Conjunctions,
    Others,
}

impl PosCategory {
    pub const ALL: [PosCategory; 8] = [
        Self::Nouns,
        Self::ProperNouns,
        Self::Verbs,
        Self::Adjectives,
        Self::Particles,
        Self::Auxiliary,
        Self::Conjunctions,
        Self::Others,
    ];

    pub fn classify(major: &str, minor: &str) -> Self {
        match major {
            pos::NOUN if minor == pos::PROPER_NOUN => Self::ProperNouns,
            pos::NOUN => Self::Nouns,
            pos::VERB => Self::Verbs,
            pos::ADJECTIVE | pos::ADJECTIVAL_NOUN => Self::Adjectives,
            pos::PARTICLE => Self::Particles,
            pos::AUXILIARY_VERB => Self::Auxiliary,
            pos::CONJUNCTION => Self::Conjunctions,
            _ => Self::Others,
        }
    }
}

/// JLPT level, N5 easiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N1,
    N2,
    N3,
    N4,
    N5,
}

impl JlptLevel {
    pub const ALL: [JlptLevel; 5] = [Self::N1, Self::N2, Self::N3, Self::N4, Self::N5];

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::N1),
            2 => Some(Self::N2),
            3 => Some(Self::N3),
            4 => Some(Self::N4),
            5 => Some(Self::N5),
            _ => None,
        }
    }
}

pub type PosDistribution = BTreeMap<PosCategory, u64>;
pub type JlptDistribution = BTreeMap<JlptLevel, u64>;

/// Classify every token; all categories are present in the result
pub fn pos_distribution(tokens: &[EnrichedToken]) -> PosDistribution {
    let mut counts: PosDistribution = PosCategory::ALL.iter().map(|c| (*c, 0)).collect();
    for token in tokens {
        *counts
            .entry(PosCategory::classify(&token.pos.major, &token.pos.minor))
            .or_default() += 1;
    }
    counts
}

/// Count tokens per JLPT level; tokens without a level are left out
pub fn jlpt_distribution<'a>(tokens: impl IntoIterator<Item = &'a EnrichedToken>) -> JlptDistribution {
    let mut counts: JlptDistribution = JlptLevel::ALL.iter().map(|l| (*l, 0)).collect();
    for level in tokens
        .into_iter()
        .filter_map(|t| t.jlpt_level.and_then(JlptLevel::from_level))
    {
        *counts.entry(level).or_default() += 1;
    }
    counts
}
