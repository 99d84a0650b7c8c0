//! The context object every pipeline stage receives explicitly.
//!
//! Holds the encoder plus the lemma and expansion caches, so nothing in the
//! pipeline relies on process-wide state.

use std::collections::BTreeSet;

use crate::phrases::{
    normalize, ExpansionCache, LemmaCache, Lemmatizer, PhraseRecord, PhraseTable, SynonymTable,
    DEFAULT_EXPANSION_CACHE_CAPACITY, DEFAULT_LEMMA_CACHE_CAPACITY,
};
use crate::search::{self, SearchError, SearchHit};
use crate::semantic::{EmbeddingError, Encoder};

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub lemma_cache_capacity: usize,
    pub expansion_cache_capacity: usize,
    pub synonym_groups: Vec<Vec<String>>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            lemma_cache_capacity: DEFAULT_LEMMA_CACHE_CAPACITY,
            expansion_cache_capacity: DEFAULT_EXPANSION_CACHE_CAPACITY,
            synonym_groups: vec![],
        }
    }
}

pub struct PhraseService {
    encoder: Box<dyn Encoder>,
    lemmas: LemmaCache,
    expansions: ExpansionCache,
    synonyms: SynonymTable,
}

impl PhraseService {
    pub fn new(
        encoder: Box<dyn Encoder>,
        lemmatizer: Box<dyn Lemmatizer>,
        options: ServiceOptions,
    ) -> Self {
        let lemmas = LemmaCache::new(lemmatizer, options.lemma_cache_capacity);
        let synonyms = if options.synonym_groups.is_empty() {
            SynonymTable::empty()
        } else {
            SynonymTable::from_groups(&options.synonym_groups, &lemmas)
        };

        Self {
            encoder,
            lemmas,
            expansions: ExpansionCache::new(options.expansion_cache_capacity),
            synonyms,
        }
    }

    pub fn expand(&self, template: &str) -> Vec<String> {
        self.expansions.expand(template)
    }

    pub fn lemma_set(&self, normalized: &str) -> BTreeSet<String> {
        self.lemmas.lemma_set(normalized)
    }

    /// One record per expansion of `phrase`, in expansion order.
    pub fn records_for_row(
        &self,
        phrase: &str,
        topics: &[String],
        comment: &str,
    ) -> Vec<PhraseRecord> {
        self.expand(phrase)
            .into_iter()
            .map(|variant| {
                let normalized = normalize(&variant);
                PhraseRecord {
                    phrase_display: phrase.to_string(),
                    phrase_lemmas: self.lemma_set(&normalized),
                    phrase_variant: variant,
                    phrase_normalized: normalized,
                    topics: topics.to_vec(),
                    comment: comment.to_string(),
                }
            })
            .collect()
    }

    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.encoder.encode_batch(texts)
    }

    pub fn semantic_search(
        &self,
        query: &str,
        table: &PhraseTable,
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        search::semantic_search(self.encoder.as_ref(), query, table, top_k, threshold)
    }

    pub fn keyword_search(&self, query: &str, table: &PhraseTable) -> Vec<SearchHit> {
        search::keyword_search(query, table, &self.lemmas, &self.synonyms)
    }
}
