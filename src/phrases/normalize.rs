//! Text normalization and lemmatization.
//!
//! Normalized text is the comparable form of a phrase: lowercase with every
//! whitespace run collapsed to one space. Lemmas are produced per word token
//! and memoized, since analysis is the expensive part and the vocabulary of a
//! phrase book is small and repetitive.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use rsmorphy::prelude::*;
use rust_stemmers::{Algorithm, Stemmer};

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+").expect("Failed to compile word regex"));

/// Default number of distinct words kept in the lemma cache
pub const DEFAULT_LEMMA_CACHE_CAPACITY: usize = 10_000;

/// Lowercase, collapse whitespace runs to a single space, trim.
pub fn normalize(text: impl AsRef<str>) -> String {
    text.as_ref()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maximal runs of word characters, in order.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

/// Maps a single word to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

/// Dictionary lemmatizer backed by the OpenCorpora morphology.
///
/// Every word maps to the normal form of its most probable parse, so
/// `кредита` and `кредит` share the lemma `кредит`, and `хочешь` and `хочу`
/// share `хотеть`. Words the analyzer cannot parse are kept as they are.
pub struct MorphLemmatizer {
    morph: MorphAnalyzer,
}

impl MorphLemmatizer {
    /// Load the bundled Russian dictionary.
    pub fn russian() -> Self {
        Self {
            morph: MorphAnalyzer::from_file(rsmorphy_dict_ru::DICT_PATH),
        }
    }
}

impl Lemmatizer for MorphLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let word = word.to_lowercase();

        self.morph
            .parse(&word)
            .first()
            .map(|parsed| parsed.lex.get_normal_form(&self.morph).to_lowercase())
            .unwrap_or(word)
    }
}

/// Snowball-based lemmatizer.
///
/// Suffix stripping only: inflections that change the stem get different
/// lemmas.
pub struct SnowballLemmatizer {
    stemmer: Stemmer,
}

#[derive(Debug, thiserror::Error)]
pub enum LemmatizerError {
    #[error("Unsupported stemmer language: {0}")]
    UnsupportedLanguage(String),
}

impl SnowballLemmatizer {
    pub fn new(language: &str) -> Result<Self, LemmatizerError> {
        let algorithm = Self::parse_language(language)?;

        Ok(Self {
            stemmer: Stemmer::create(algorithm),
        })
    }

    fn parse_language(language: &str) -> Result<Algorithm, LemmatizerError> {
        match language.to_lowercase().as_str() {
            "russian" | "ru" => Ok(Algorithm::Russian),
            "english" | "en" => Ok(Algorithm::English),
            "german" | "de" => Ok(Algorithm::German),
            "french" | "fr" => Ok(Algorithm::French),
            "spanish" | "es" => Ok(Algorithm::Spanish),
            "italian" | "it" => Ok(Algorithm::Italian),
            "portuguese" | "pt" => Ok(Algorithm::Portuguese),
            "dutch" | "nl" => Ok(Algorithm::Dutch),
            "swedish" | "sv" => Ok(Algorithm::Swedish),
            "norwegian" | "no" => Ok(Algorithm::Norwegian),
            "danish" | "da" => Ok(Algorithm::Danish),
            "finnish" | "fi" => Ok(Algorithm::Finnish),
            "hungarian" | "hu" => Ok(Algorithm::Hungarian),
            "romanian" | "ro" => Ok(Algorithm::Romanian),
            "turkish" | "tr" => Ok(Algorithm::Turkish),
            _ => Err(LemmatizerError::UnsupportedLanguage(language.to_string())),
        }
    }
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }
}

/// Bounded memoizing cache in front of a [`Lemmatizer`].
///
/// The lock is not held while the analyzer runs, so two callers racing on a
/// new word may both analyze it; both get the same answer.
pub struct LemmaCache {
    lemmatizer: Box<dyn Lemmatizer>,
    cache: Mutex<LruCache<String, String>>,
}

impl LemmaCache {
    pub fn new(lemmatizer: Box<dyn Lemmatizer>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            lemmatizer,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn lemmatize(&self, word: &str) -> String {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(lemma) = cache.get(word) {
                return lemma.clone();
            }
        }

        let lemma = self.lemmatizer.lemmatize(word);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(word.to_string(), lemma.clone());
        }

        lemma
    }

    /// Lemmas of every word token in already normalized text.
    pub fn lemma_set(&self, normalized: &str) -> BTreeSet<String> {
        tokenize(normalized)
            .into_iter()
            .map(|word| self.lemmatize(word))
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}
