/*!
 * Mock tokenizer implementations for testing.
 *
 * The mock segments text by greedy longest match against a small scripted
 * lexicon and falls back to one token per character. Behaviors:
 * - `MockTokenizer::working()` - Always succeeds
 * - `MockTokenizer::intermittent(n)` - Fails every Nth call
 * - `MockTokenizer::failing()` - Always fails with an error
 * - `MockTokenizer::panicking()` - Panics inside the backend
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::TokenizerError;
use crate::tokenizer::{pos, PartOfSpeech, Token, Tokenizer, WordOrigin, DEFAULT_MAX_INPUT_BYTES};

/// Behavior mode for the mock tokenizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails on every Nth call (1-based)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Panics instead of returning
    Panicking,
}

/// Scripted analyzer for tests
#[derive(Debug)]
pub struct MockTokenizer {
    /// Behavior mode
    behavior: MockBehavior,
    /// Known words keyed by surface
    lexicon: HashMap<String, Token>,
    /// Longest surface in the lexicon, in characters
    longest_entry: usize,
    /// Per-call input limit, enforced like a real backend
    max_input_bytes: usize,
    /// Call counter for intermittent failures
    call_count: Arc<AtomicUsize>,
    /// Byte length of every input received
    received: Mutex<Vec<usize>>,
}

impl MockTokenizer {
    /// Create a new mock tokenizer with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            lexicon: HashMap::new(),
            longest_entry: 0,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            call_count: Arc::new(AtomicUsize::new(0)),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a working mock tokenizer that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock tokenizer
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock tokenizer that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock tokenizer that panics on every call
    pub fn panicking() -> Self {
        Self::new(MockBehavior::Panicking)
    }

    /// Override the per-call byte limit
    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Register a token; its surface becomes the lookup key
    pub fn with_token(mut self, token: Token) -> Self {
        self.longest_entry = self.longest_entry.max(token.surface.chars().count());
        self.lexicon.insert(token.surface.clone(), token);
        self
    }

    /// Register a word by surface, base form and part of speech
    pub fn with_word(self, surface: &str, base_form: &str, major: &str, minor: &str) -> Self {
        self.with_token(Token::new(surface, base_form, PartOfSpeech::new(major, minor)))
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Byte length of each input, in call order
    pub fn received_sizes(&self) -> Vec<usize> {
        self.received.lock().clone()
    }

    fn fallback_token(c: char) -> Token {
        let surface = c.to_string();
        let (major, minor, origin) = match c {
            '。' | '、' | '！' | '？' | '!' | '?' | '「' | '」' | '…' | '・' => {
                (pos::SUPPLEMENTARY_SYMBOL, "句点", WordOrigin::Symbol)
            }
            '0'..='9' | '０'..='９' => (pos::NOUN, pos::NUMERAL, WordOrigin::Kango),
            _ => (pos::NOUN, "普通名詞", WordOrigin::Unknown),
        };
        Token::new(surface.clone(), surface, PartOfSpeech::new(major, minor)).with_origin(origin)
    }

    fn segment(&self, text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }

            let max_len = self.longest_entry.min(chars.len() - i);
            let matched = (1..=max_len).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.lexicon.get(&candidate).map(|t| (len, t.clone()))
            });

            match matched {
                Some((len, token)) => {
                    tokens.push(token);
                    i += len;
                }
                None => {
                    tokens.push(Self::fallback_token(chars[i]));
                    i += 1;
                }
            }
        }

        tokens
    }
}

impl Tokenizer for MockTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().push(text.len());

        if text.len() > self.max_input_bytes {
            return Err(TokenizerError::InputTooLarge {
                bytes: text.len(),
                limit: self.max_input_bytes,
            });
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.segment(text)),
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && call % fail_every == 0 => {
                Err(TokenizerError::Analysis(format!("simulated failure on call {}", call)))
            }
            MockBehavior::Intermittent { .. } => Ok(self.segment(text)),
            MockBehavior::Failing => Err(TokenizerError::Analysis("simulated failure".to_string())),
            MockBehavior::Panicking => panic!("simulated analyzer crash"),
        }
    }

    fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    fn name(&self) -> &str {
        "mock"
    }
}
