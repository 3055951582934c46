/*!
 * Dictionary-backed analyzer using the vibrato Viterbi tokenizer.
 *
 * Expects a compiled system dictionary (for example UniDic built with
 * `vibrato compile`). Feature columns are mapped with the configured
 * `FeatureLayout`.
 */

use log::info;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::app_config::FeatureLayout;
use crate::errors::TokenizerError;
use crate::tokenizer::features::parse_feature;
use crate::tokenizer::{Token, Tokenizer, DEFAULT_MAX_INPUT_BYTES};

pub struct VibratoTokenizer {
    // @field: Immutable analyzer; workers are created per call
    tokenizer: ::vibrato::Tokenizer,

    // @field: Feature column layout of the loaded dictionary
    layout: FeatureLayout,
}

impl VibratoTokenizer {
    /// Load a system dictionary from disk
    pub fn from_path<P: AsRef<Path>>(path: P, layout: FeatureLayout) -> Result<Self, TokenizerError> {
        let path = path.as_ref();
        let load_error = |message: String| TokenizerError::DictionaryLoad {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let dictionary = ::vibrato::Dictionary::read(BufReader::new(file))
            .map_err(|e| load_error(e.to_string()))?;

        info!("Loaded dictionary {} ({:?} layout)", path.display(), layout);
        Ok(Self {
            tokenizer: ::vibrato::Tokenizer::new(dictionary),
            layout,
        })
    }
}

impl fmt::Debug for VibratoTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VibratoTokenizer")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for VibratoTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
        if text.len() > DEFAULT_MAX_INPUT_BYTES {
            return Err(TokenizerError::InputTooLarge {
                bytes: text.len(),
                limit: DEFAULT_MAX_INPUT_BYTES,
            });
        }

        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let tokens = worker
            .token_iter()
            .filter(|t| !t.surface().trim().is_empty())
            .map(|t| parse_feature(self.layout, t.surface(), t.feature()))
            .collect();
        Ok(tokens)
    }

    fn name(&self) -> &str {
        "vibrato"
    }
}
