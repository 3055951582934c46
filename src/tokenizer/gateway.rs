/*!
 * Size-limited, best-effort access to a tokenizer backend.
 *
 * Analyzer backends accept a bounded amount of text per call. The gateway
 * packs whole lines into chunks under that bound, splits pathological
 * single lines into fixed-size character segments, drops drawing command
 * lines, and turns any backend failure into an empty result for the chunk
 * so one bad chunk never aborts an episode.
 */

use anyhow::Result;
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::app_config::Config;
use crate::language_utils::DrawingCommandDetector;
use crate::tokenizer::{Token, Tokenizer};

/// Worst-case UTF-8 width of a single character
const MAX_UTF8_CHAR_BYTES: usize = 4;

/// Chunking front-end shared by every analysis in a run
#[derive(Debug, Clone)]
pub struct TokenizerGateway {
    // @field: Backend, shared read-only
    tokenizer: Arc<dyn Tokenizer>,

    // @field: Effective per-call limit
    max_input_bytes: usize,

    // @field: Lines to discard before chunking
    drawing: DrawingCommandDetector,
}

impl TokenizerGateway {
    /// Create a gateway; the limit is capped by what the backend accepts
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_input_bytes: usize, drawing: DrawingCommandDetector) -> Self {
        let max_input_bytes = max_input_bytes
            .min(tokenizer.max_input_bytes())
            .max(MAX_UTF8_CHAR_BYTES);
        Self {
            tokenizer,
            max_input_bytes,
            drawing,
        }
    }

    pub fn from_config(tokenizer: Arc<dyn Tokenizer>, config: &Config) -> Result<Self> {
        let drawing = DrawingCommandDetector::new(&config.filters.drawing_command_patterns)?;
        Ok(Self::new(tokenizer, config.tokenizer.max_input_bytes, drawing))
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    /// Characters per segment when a single line exceeds the limit
    pub fn segment_chars(&self) -> usize {
        self.max_input_bytes / MAX_UTF8_CHAR_BYTES
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Split text into the chunks that would be sent to the backend
    ///
    /// Lines keep their order and are rejoined with `\n` inside a chunk.
    /// Every chunk fits in `max_input_bytes`.
    pub fn plan_chunks(&self, text: &str) -> Vec<String> {
        let limit = self.max_input_bytes;
        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        let mut pending_bytes = 0usize;

        let flush = |pending: &mut Vec<&str>, pending_bytes: &mut usize, chunks: &mut Vec<String>| {
            if !pending.is_empty() {
                chunks.push(pending.join("\n"));
                pending.clear();
            }
            *pending_bytes = 0;
        };

        for line in text.lines() {
            if self.drawing.is_drawing_command(line) {
                debug!("Dropping drawing command line: {}", line);
                continue;
            }

            // +1 for the newline that rejoins the line
            let line_bytes = line.len() + 1;

            if line_bytes > limit {
                flush(&mut pending, &mut pending_bytes, &mut chunks);
                let chars: Vec<char> = line.chars().collect();
                for segment in chars.chunks(self.segment_chars()) {
                    chunks.push(segment.iter().collect());
                }
                continue;
            }

            if pending_bytes + line_bytes > limit {
                flush(&mut pending, &mut pending_bytes, &mut chunks);
            }
            pending.push(line);
            pending_bytes += line_bytes;
        }
        flush(&mut pending, &mut pending_bytes, &mut chunks);

        chunks
    }

    /// Tokenize arbitrarily large text
    ///
    /// Never fails: a chunk the backend rejects contributes no tokens.
    pub fn tokenize_safe(&self, text: &str) -> Vec<Token> {
        let chunks = self.plan_chunks(text);
        let mut tokens = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let mut chunk_tokens = self.tokenize_chunk(chunk);
            debug!("Chunk {}/{}: {} bytes, {} tokens", idx + 1, chunks.len(), chunk.len(), chunk_tokens.len());
            tokens.append(&mut chunk_tokens);
        }
        tokens
    }

    fn tokenize_chunk(&self, chunk: &str) -> Vec<Token> {
        if chunk.trim().is_empty() {
            return Vec::new();
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.tokenizer.tokenize(chunk))) {
            Ok(Ok(tokens)) => tokens,
            Ok(Err(e)) => {
                warn!("{} failed on a {} byte chunk: {}", self.tokenizer.name(), chunk.len(), e);
                Vec::new()
            }
            Err(_) => {
                warn!("{} panicked on a {} byte chunk", self.tokenizer.name(), chunk.len());
                Vec::new()
            }
        }
    }
}
