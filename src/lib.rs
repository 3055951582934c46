/*!
 * # kotoba-stats - Japanese subtitle vocabulary and difficulty statistics
 *
 * A Rust library that turns Japanese subtitle tracks into per-episode and
 * per-series statistics for learners.
 *
 * ## Features
 *
 * - Parse SRT, ASS/SSA and WebVTT subtitle files
 * - Rebuild sentences from timed subtitle fragments
 * - Tokenize large texts under a per-call size limit
 * - Resolve tokens against a dictionary/frequency corpus
 * - Compute vocabulary coverage curves, POS and JLPT distributions,
 *   readability difficulty and reading speed
 * - Aggregate episodes into series statistics
 * - Batch processing with a bounded worker pool
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file parsing
 * - `reconstruct`: Sentence reconstruction and on-screen time
 * - `tokenizer`: Morphological analysis:
 *   - `tokenizer::gateway`: Size-limited, best-effort chunking
 *   - `tokenizer::vibrato`: Dictionary-backed analyzer
 *   - `tokenizer::mock`: Scripted analyzer for tests
 * - `vocabulary`: Corpus loading and token resolution
 * - `stats`: Per-episode statistics
 * - `aggregate`: Series statistics
 * - `pipeline`: Per-episode orchestration
 * - `file_utils`: File system operations
 * - `app_controller`: Batch controller
 * - `language_utils`: Japanese script utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod reconstruct;
pub mod tokenizer;
pub mod vocabulary;
pub mod stats;
pub mod aggregate;
pub mod pipeline;
pub mod app_controller;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleEvent, SubtitleParser};
pub use reconstruct::{reconstruct, ReconstructOptions, ReconstructedText};
pub use tokenizer::{Token, Tokenizer, TokenizerGateway};
pub use vocabulary::{EnrichedToken, Resolver, VocabCorpus};
pub use stats::{compute_episode_stats, EpisodeStats, SeriesStats};
pub use aggregate::aggregate_series;
pub use pipeline::{EpisodeAnalyzer, SeriesAggregator};
pub use errors::{AppError, CorpusError, SubtitleError, TokenizerError};
