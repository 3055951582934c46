use crate::app_config::FeatureLayout;
use crate::tokenizer::{PartOfSpeech, Token, WordOrigin};

// @module: Mapping of dictionary feature strings onto tokens

/// Placeholder used by dictionaries for an empty column
const UNSET: &str = "*";

struct Columns {
    pos_major: usize,
    pos_minor: usize,
    base: usize,
    normalized: usize,
    origin: Option<usize>,
}

impl FeatureLayout {
    fn columns(self) -> Columns {
        match self {
            // pos1, pos2, ..., lemma(7), orth, pron, orthBase(10), pronBase, goshu(12)
            FeatureLayout::Unidic => Columns {
                pos_major: 0,
                pos_minor: 1,
                base: 10,
                normalized: 7,
                origin: Some(12),
            },
            // pos, pos1, pos2, pos3, cType, cForm, base(6), reading, pron
            FeatureLayout::Ipadic => Columns {
                pos_major: 0,
                pos_minor: 1,
                base: 6,
                normalized: 6,
                origin: None,
            },
        }
    }
}

/// Build a token from a comma separated feature string
///
/// Missing or unset base and normalized columns fall back to the surface.
pub fn parse_feature(layout: FeatureLayout, surface: &str, feature: &str) -> Token {
    let fields: Vec<&str> = feature.split(',').collect();
    let columns = layout.columns();
    let column = |idx: usize| {
        fields
            .get(idx)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty() && *f != UNSET)
    };

    let base = column(columns.base).unwrap_or(surface);
    let normalized = column(columns.normalized).unwrap_or(base);
    let origin = columns
        .origin
        .and_then(column)
        .map(WordOrigin::from_goshu)
        .unwrap_or_default();

    Token::new(
        surface,
        base,
        PartOfSpeech::new(
            column(columns.pos_major).unwrap_or(UNSET),
            column(columns.pos_minor).unwrap_or(UNSET),
        ),
    )
    .with_normalized(normalized)
    .with_origin(origin)
}
