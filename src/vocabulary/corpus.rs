use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::CorpusError;

// @module: Read-only dictionary and frequency corpus

/// One dictionary record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    // @field: Canonical headword
    pub word: String,

    // @field: Kana reading
    #[serde(default)]
    pub reading: Option<String>,

    // @field: Glosses, most common sense first
    #[serde(default)]
    pub meanings: Vec<String>,

    // @field: JLPT level 1-5 (N1 hardest)
    #[serde(default, alias = "jlpt_level")]
    pub level: Option<u8>,

    // @field: Rank of the written form in a general frequency list
    #[serde(default)]
    pub frequency_rank: Option<u32>,

    // @field: Rank of the kana form in a general frequency list
    #[serde(default)]
    pub kana_frequency_rank: Option<u32>,
}

/// Corpus indexed by headword and reading
///
/// Every key maps to the entries reachable through it, ordered by ascending
/// `frequency_rank` with unranked entries last and ties in corpus order.
#[derive(Debug, Clone, Default)]
pub struct VocabCorpus {
    entries: Vec<VocabEntry>,
    index: HashMap<String, Vec<usize>>,
}

impl VocabCorpus {
    /// Build the corpus and its lookup index
    pub fn from_entries(entries: Vec<VocabEntry>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            index.entry(entry.word.clone()).or_default().push(idx);
            if let Some(reading) = entry.reading.as_deref() {
                if !reading.is_empty() && reading != entry.word {
                    index.entry(reading.to_string()).or_default().push(idx);
                }
            }
        }

        for postings in index.values_mut() {
            postings.sort_by_key(|&idx| {
                let rank = entries[idx].frequency_rank;
                (rank.is_none(), rank, idx)
            });
            postings.dedup();
        }

        Self { entries, index }
    }

    /// Load a JSON array of records
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let file = File::open(path.as_ref())?;
        let entries: Vec<VocabEntry> = serde_json::from_reader(BufReader::new(file))?;
        let corpus = Self::from_entries(entries);
        info!("Loaded {} vocabulary entries ({} keys)", corpus.len(), corpus.index.len());
        Ok(corpus)
    }

    /// Entries whose headword or reading equals `key`, best ranked first
    pub fn lookup(&self, key: &str) -> Vec<&VocabEntry> {
        self.index
            .get(key)
            .map(|postings| postings.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }

    /// Best ranked entry whose headword is exactly `word`
    pub fn lookup_word(&self, word: &str) -> Option<&VocabEntry> {
        self.index
            .get(word)?
            .iter()
            .map(|&idx| &self.entries[idx])
            .find(|entry| entry.word == word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
