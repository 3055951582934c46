/*!
 * Difficulty scores.
 *
 * The readability difficulty comes from a pluggable scorer producing a raw
 * score on the jReadability scale (about 0.5 hard to 6.5 easy), which is
 * then mapped onto a 1-10 harder-is-higher scale tuned for anime dialogue.
 * The ML difficulty is predicted elsewhere; only its scaling lives here.
 */

use anyhow::{anyhow, Result};
use log::warn;
use std::fmt::Debug;
use std::sync::Arc;

use crate::stats::lexical::sentence_count;
use crate::stats::round_to;
use crate::tokenizer::{pos, TokenizerGateway, WordOrigin};

/// Raw jReadability score of the easiest text
pub const JREADABILITY_EASIEST: f64 = 6.5;

const STANDARD_SCALE_FACTOR: f64 = 1.5;

/// Band of the 1-10 standard scale that anime dialogue falls into
const ANIME_DIFFICULTY_MIN: f64 = 2.0;
const ANIME_DIFFICULTY_MAX: f64 = 5.0;

const SCALE_MIN: f64 = 1.0;
const SCALE_MAX: f64 = 10.0;

/// Raw ML predictions observed for the easiest and hardest shows
const ML_RAW_MIN: f64 = 22.0;
const ML_RAW_MAX: f64 = 33.0;

/// Produces a raw readability score for a text
pub trait ReadabilityScorer: Send + Sync + Debug {
    fn score(&self, text: &str) -> Result<f64>;
}

/// Whether a readability scorer is available for this run
#[derive(Debug, Clone)]
pub enum Readability {
    Available(Arc<dyn ReadabilityScorer>),
    Unavailable,
}

impl Readability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Map a raw jReadability score onto the 1-10 scale
pub fn scale_readability(raw: f64) -> f64 {
    let standard = SCALE_MIN + (JREADABILITY_EASIEST - raw) * STANDARD_SCALE_FACTOR;
    let clamped = standard.clamp(ANIME_DIFFICULTY_MIN, ANIME_DIFFICULTY_MAX);
    let normalized = (clamped - ANIME_DIFFICULTY_MIN) / (ANIME_DIFFICULTY_MAX - ANIME_DIFFICULTY_MIN);
    round_to(SCALE_MIN + normalized * (SCALE_MAX - SCALE_MIN), 1)
}

/// Score a text, returning `(scaled, raw)`
///
/// Empty text, a missing scorer or a scorer failure all give `(0.0, 0.0)`.
pub fn readability_difficulty(text: &str, readability: &Readability) -> (f64, f64) {
    let Readability::Available(scorer) = readability else {
        return (0.0, 0.0);
    };
    if text.trim().is_empty() {
        return (0.0, 0.0);
    }

    match scorer.score(text) {
        Ok(raw) if raw.is_finite() => (scale_readability(raw), raw),
        Ok(raw) => {
            warn!("Readability scorer returned a non-finite score: {}", raw);
            (0.0, 0.0)
        }
        Err(e) => {
            warn!("Readability scoring failed: {}", e);
            (0.0, 0.0)
        }
    }
}

/// Map a raw ML prediction onto 0-10
pub fn scale_ml_difficulty(raw: f64) -> f64 {
    ((raw - ML_RAW_MIN) / (ML_RAW_MAX - ML_RAW_MIN) * 10.0).clamp(0.0, 10.0)
}

/// jReadability regression over a morphological analysis
///
/// `11.724 - 0.056 * words/sentence - 0.126 * kango% - 0.042 * wago%
///  - 0.145 * verb% - 0.044 * particle%`
#[derive(Debug, Clone)]
pub struct JReadabilityScorer {
    gateway: TokenizerGateway,
}

impl JReadabilityScorer {
    pub fn new(gateway: TokenizerGateway) -> Self {
        Self { gateway }
    }
}

impl ReadabilityScorer for JReadabilityScorer {
    fn score(&self, text: &str) -> Result<f64> {
        let words: Vec<_> = self
            .gateway
            .tokenize_safe(text)
            .into_iter()
            .filter(|t| !t.pos.is_symbol())
            .collect();

        if words.is_empty() {
            return Err(anyhow!("No words to score"));
        }

        let total = words.len() as f64;
        let rate = |n: usize| n as f64 / total * 100.0;

        let kango = words.iter().filter(|t| t.origin == WordOrigin::Kango).count();
        let wago = words.iter().filter(|t| t.origin == WordOrigin::Wago).count();
        let verbs = words.iter().filter(|t| t.pos.major == pos::VERB).count();
        let particles = words.iter().filter(|t| t.pos.major == pos::PARTICLE).count();
        let mean_words = total / sentence_count(text) as f64;

        Ok(11.724
            - 0.056 * mean_words
            - 0.126 * rate(kango)
            - 0.042 * rate(wago)
            - 0.145 * rate(verbs)
            - 0.044 * rate(particles))
    }
}
