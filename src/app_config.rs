use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path of the vocabulary corpus (JSON array of dictionary records)
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Sentence reconstruction settings
    #[serde(default)]
    pub reconstruct: ReconstructConfig,

    /// Morphological analyzer settings
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Line filters applied before tokenizing
    #[serde(default)]
    pub filters: FilterConfig,

    /// Readability scoring settings
    #[serde(default)]
    pub readability: ReadabilityConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Sentence reconstruction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReconstructConfig {
    // @field: Silence (ms) between two events that closes a sentence
    #[serde(default = "default_gap_threshold_ms")]
    pub gap_threshold_ms: u64,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            gap_threshold_ms: default_gap_threshold_ms(),
        }
    }
}

/// Column layout of the dictionary feature string
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureLayout {
    // @layout: UniDic (lemma, orthBase and goshu columns)
    #[default]
    Unidic,
    // @layout: IPADIC (base form only)
    Ipadic,
}

/// Morphological analyzer configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenizerConfig {
    // @field: Compiled system dictionary
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,

    // @field: Hard input limit per analyzer call
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    // @field: Feature column layout of the dictionary
    #[serde(default)]
    pub feature_layout: FeatureLayout,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            dictionary_path: default_dictionary_path(),
            max_input_bytes: default_max_input_bytes(),
            feature_layout: FeatureLayout::default(),
        }
    }
}

/// Line filter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    /// Regexes identifying vector drawing commands in subtitle text
    #[serde(default = "default_drawing_command_patterns")]
    pub drawing_command_patterns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            drawing_command_patterns: default_drawing_command_patterns(),
        }
    }
}

/// Readability scoring configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReadabilityConfig {
    /// Whether the built-in readability scorer is available
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Batch processing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Number of episodes analyzed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_corpus_path() -> String {
    "data/vocab.json".to_string()
}

fn default_gap_threshold_ms() -> u64 {
    500
}

fn default_dictionary_path() -> String {
    "data/system.dic".to_string()
}

fn default_max_input_bytes() -> usize {
    40_000
}

fn default_drawing_command_patterns() -> Vec<String> {
    vec![r"\b[mlb]\s+-?\d".to_string()]
}

fn default_workers() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Every chunk must fit at least one multi-byte character and its newline
        if self.tokenizer.max_input_bytes < 4 {
            return Err(anyhow!(
                "tokenizer.max_input_bytes must be at least 4, got {}",
                self.tokenizer.max_input_bytes
            ));
        }

        if self.batch.workers == 0 {
            return Err(anyhow!("batch.workers must be greater than zero"));
        }

        if self.filters.drawing_command_patterns.is_empty() {
            return Err(anyhow!("filters.drawing_command_patterns must not be empty"));
        }

        for pattern in &self.filters.drawing_command_patterns {
            Regex::new(pattern)
                .with_context(|| format!("Invalid drawing command pattern: {}", pattern))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            corpus_path: default_corpus_path(),
            reconstruct: ReconstructConfig::default(),
            tokenizer: TokenizerConfig::default(),
            filters: FilterConfig::default(),
            readability: ReadabilityConfig::default(),
            batch: BatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
