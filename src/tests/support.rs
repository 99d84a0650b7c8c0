//! Deterministic fakes and fixture builders shared by unit and scenario tests.

use std::collections::HashMap;

use crate::loader::{FetchError, SourceFetcher};
use crate::phrases::{normalize, LemmaCache, Lemmatizer, PhraseRecord, PhraseTable};
use crate::semantic::{EmbeddingError, EmbeddingIndex, Encoder};

/// Encoder returning preset vectors, keyed by normalized text.
#[derive(Default)]
pub struct FixedEncoder {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(normalize(text), vector);
        self
    }
}

impl Encoder for FixedEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(&normalize(text))
            .cloned()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed(format!("no vector for {text:?}")))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Bag-of-words encoder: one dimension per hashed word.
///
/// Texts sharing every word score 1.0, texts sharing none score 0.0.
pub struct HashingEncoder {
    dimensions: usize,
}

impl HashingEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn bucket(&self, word: &str) -> usize {
        // FNV-1a
        let hash = word.bytes().fold(0xcbf29ce484222325_u64, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x100000001b3)
        });
        (hash % self.dimensions as u64) as usize
    }
}

impl Encoder for HashingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0; self.dimensions];
        for word in crate::phrases::tokenize(&normalize(text)) {
            vector[self.bucket(word)] += 1.0;
        }
        Ok(vector)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Encoder that always fails, for exercising error paths.
pub struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn encode(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("encoder offline".to_string()))
    }

    fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("encoder offline".to_string()))
    }
}

/// Lemmatizer keeping the first four characters of a word.
pub struct PrefixLemmatizer;

impl Lemmatizer for PrefixLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_lowercase().chars().take(4).collect()
    }
}

pub fn lemma_cache() -> LemmaCache {
    LemmaCache::new(Box::new(PrefixLemmatizer), 100)
}

/// A record whose lemma set is left empty.
pub fn record(display: &str, variant: &str, topics: &[&str]) -> PhraseRecord {
    PhraseRecord {
        phrase_display: display.to_string(),
        phrase_variant: variant.to_string(),
        phrase_normalized: normalize(variant),
        phrase_lemmas: Default::default(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        comment: String::new(),
    }
}

pub fn record_with(
    lemmas: &LemmaCache,
    display: &str,
    variant: &str,
    topics: &[&str],
) -> PhraseRecord {
    let mut record = record(display, variant, topics);
    record.phrase_lemmas = lemmas.lemma_set(&record.phrase_normalized);
    record
}

pub fn table_with_vectors(rows: Vec<(PhraseRecord, Vec<f32>)>) -> PhraseTable {
    let (records, vectors): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    let index = EmbeddingIndex::from_vectors(vectors).unwrap();
    PhraseTable::new(records, index).unwrap()
}

/// In-memory sources; unknown locations fail with a 404.
#[derive(Default)]
pub struct MapFetcher {
    sources: HashMap<String, Vec<u8>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, body: &str) -> Self {
        self.sources
            .insert(location.to_string(), body.as_bytes().to_vec());
        self
    }
}

impl SourceFetcher for MapFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        self.sources
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: location.to_string(),
                status: 404,
            })
    }
}
