//! Literal keyword search: lemma coverage or raw substring containment.

use crate::phrases::{normalize, tokenize, LemmaCache, PhraseRecord, PhraseTable, SynonymTable};

use super::dedupe::{dedupe, SearchHit};

/// Every row matching `query`, in table order, deduplicated by display phrase.
///
/// A row matches when either
/// - each query lemma is covered by some lemma of the row (directly or
///   through a synonym group), or
/// - each query token occurs as a substring of the row's normalized text.
///
/// A query without word tokens matches every row.
pub fn keyword_search(
    query: &str,
    table: &PhraseTable,
    lemmas: &LemmaCache,
    synonyms: &SynonymTable,
) -> Vec<SearchHit> {
    let query = normalize(query);
    let query_words = tokenize(&query);
    let query_lemmas: Vec<String> = query_words
        .iter()
        .map(|word| lemmas.lemmatize(word))
        .collect();

    let hits = table
        .records()
        .iter()
        .filter(|record| {
            lemma_match(record, &query_lemmas, synonyms) || substring_match(record, &query_words)
        })
        .map(|record| SearchHit::Unscored {
            phrase: record.phrase_display.clone(),
            topics: record.topics.clone(),
            comment: record.comment.clone(),
        })
        .collect();

    dedupe(hits)
}

fn lemma_match(record: &PhraseRecord, query_lemmas: &[String], synonyms: &SynonymTable) -> bool {
    query_lemmas.iter().all(|query_lemma| {
        record
            .phrase_lemmas
            .iter()
            .any(|phrase_lemma| synonyms.covers(phrase_lemma, query_lemma))
    })
}

fn substring_match(record: &PhraseRecord, query_words: &[&str]) -> bool {
    query_words
        .iter()
        .all(|word| record.phrase_normalized.contains(word))
}
