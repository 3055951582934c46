/*!
 * Per-episode and per-series orchestration.
 *
 * `EpisodeAnalyzer` runs the whole chain for one subtitle track:
 * reconstruct, tokenize, resolve, compute statistics. It holds only shared
 * read-only handles, so one instance can serve many worker threads.
 * `SeriesAggregator` folds finished episode records into a series record.
 */

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::aggregate::{aggregate_series, merge_frequency_maps};
use crate::app_config::Config;
use crate::reconstruct::{duration_seconds, reconstruct, ReconstructOptions};
use crate::stats::{compute_episode_stats, EpisodeStats, JReadabilityScorer, Readability, SeriesStats};
use crate::subtitle_processor::SubtitleEvent;
use crate::tokenizer::{Tokenizer, TokenizerGateway};
use crate::vocabulary::{Resolver, VocabCorpus};

/// Runs the statistics pipeline for one episode at a time
#[derive(Debug, Clone)]
pub struct EpisodeAnalyzer {
    gateway: TokenizerGateway,
    resolver: Resolver,
    readability: Readability,
    reconstruct: ReconstructOptions,
}

impl EpisodeAnalyzer {
    pub fn new(
        gateway: TokenizerGateway,
        resolver: Resolver,
        readability: Readability,
        reconstruct: ReconstructOptions,
    ) -> Self {
        Self {
            gateway,
            resolver,
            readability,
            reconstruct,
        }
    }

    /// Wire an analyzer from configuration and shared backends
    ///
    /// The built-in readability scorer reuses the same tokenizer.
    pub fn from_config(config: &Config, tokenizer: Arc<dyn Tokenizer>, corpus: Arc<VocabCorpus>) -> Result<Self> {
        let gateway = TokenizerGateway::from_config(tokenizer, config)?;
        let readability = if config.readability.enabled {
            Readability::Available(Arc::new(JReadabilityScorer::new(gateway.clone())))
        } else {
            Readability::Unavailable
        };

        Ok(Self::new(
            gateway,
            Resolver::new(corpus),
            readability,
            ReconstructOptions::from_config(config)?,
        ))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Analyze one episode
    ///
    /// Returns `None` when no text survives reconstruction or the tokenizer
    /// produces nothing.
    pub fn analyze_events(&self, events: &[SubtitleEvent]) -> Option<EpisodeStats> {
        let reconstructed = reconstruct(events, &self.reconstruct);
        if reconstructed.is_blank() {
            debug!("No text left after reconstruction of {} events", events.len());
            return None;
        }

        let text = reconstructed.text();
        let tokens = self.resolver.resolve(self.gateway.tokenize_safe(&text));
        debug!(
            "{} sentences, {} tokens, {} resolved",
            reconstructed.sentences.len(),
            tokens.len(),
            tokens.iter().filter(|t| t.is_resolved()).count()
        );

        let mut stats = compute_episode_stats(&tokens, &text, &self.readability)?;
        stats.set_timing(reconstructed.active_seconds, duration_seconds(events));
        Some(stats)
    }
}

/// Folds episode records of one series
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    resolver: Resolver,
}

impl SeriesAggregator {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Merge episodes, re-resolving the merged vocabulary for coverage
    pub fn aggregate(&self, episodes: &[EpisodeStats]) -> Option<SeriesStats> {
        let merged = merge_frequency_maps(episodes);
        let vocabulary = self.resolver.resolve_counts(&merged);
        aggregate_series(episodes, &vocabulary)
    }
}
