/*!
 * Error types for the kotoba-stats application.
 *
 * Each stage of the pipeline has its own error enum, defined with the
 * thiserror crate. The core pipeline degrades instead of failing, so most of
 * these surface only at the I/O edges (file parsing, corpus and dictionary
 * loading) or get logged and swallowed by the tokenizer gateway.
 */

use thiserror::Error;

/// Errors that can occur while reading subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// The ASS/SSA events section is missing a usable Format line
    #[error("Malformed events section: {0}")]
    MalformedEvents(String),

    /// The file parsed but contained no dialogue at all
    #[error("No subtitle events found in {0}")]
    NoEvents(String),
}

/// Errors raised by a morphological analyzer backend
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// The system dictionary could not be opened or decoded
    #[error("Failed to load dictionary {path}: {message}")]
    DictionaryLoad {
        /// Dictionary path as configured
        path: String,
        /// Underlying failure
        message: String,
    },

    /// The analyzer rejected or crashed on an input chunk
    #[error("Tokenization failed: {0}")]
    Analysis(String),

    /// Input exceeded what the backend accepts
    #[error("Input of {bytes} bytes exceeds the analyzer limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected chunk
        bytes: usize,
        /// Backend limit
        limit: usize,
    },
}

/// Errors that can occur when loading the vocabulary corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Reading the corpus file failed
    #[error("Failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus JSON did not match the expected record layout
    #[error("Failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the tokenizer backend
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// Error from the vocabulary corpus
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
