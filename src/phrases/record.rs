//! The unified phrase table and the topic catalog derived from it.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::semantic::{EmbeddingIndex, IndexError};

/// One literal phrase variant of one source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseRecord {
    /// The template as written in the source, shown to users
    pub phrase_display: String,
    /// One expansion of `phrase_display`
    pub phrase_variant: String,
    pub phrase_normalized: String,
    pub phrase_lemmas: BTreeSet<String>,
    /// Raw topic labels, in column order
    pub topics: Vec<String>,
    pub comment: String,
}

/// Phrase records plus their embeddings, row for row.
///
/// Built once per load. Every derived table carries its own matching index,
/// so `records.len() == index.len()` always holds.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    records: Vec<PhraseRecord>,
    index: EmbeddingIndex,
}

impl PhraseTable {
    pub fn new(records: Vec<PhraseRecord>, index: EmbeddingIndex) -> Result<Self, IndexError> {
        if records.len() != index.len() {
            return Err(IndexError::LengthMismatch {
                rows: records.len(),
                vectors: index.len(),
            });
        }

        Ok(Self { records, index })
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PhraseRecord] {
        &self.records
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&PhraseRecord> {
        self.records.get(row)
    }

    /// Sub-table of rows tagged with at least one of the selected topics.
    ///
    /// Selection entries are compared by [`topic_key`]. An empty selection
    /// keeps every row.
    pub fn restrict_to_topics(&self, selected: &[String]) -> PhraseTable {
        let keys = topic_keys(selected);
        if keys.is_empty() {
            return self.clone();
        }

        let rows: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| has_any_topic(record, &keys))
            .map(|(row, _)| row)
            .collect();

        PhraseTable {
            records: rows.iter().map(|&row| self.records[row].clone()).collect(),
            index: self.index.select(&rows),
        }
    }

    /// First record of every distinct display phrase tagged with one of the
    /// selected topics, in table order.
    pub fn phrases_for_topics(&self, selected: &[String]) -> Vec<&PhraseRecord> {
        let keys = topic_keys(selected);
        let mut seen = HashSet::new();

        self.records
            .iter()
            .filter(|record| has_any_topic(record, &keys))
            .filter(|record| seen.insert(record.phrase_display.as_str()))
            .collect()
    }
}

/// Comparable form of a topic label.
pub fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase()
}

fn topic_keys(selected: &[String]) -> HashSet<String> {
    selected
        .iter()
        .map(|topic| topic_key(topic))
        .filter(|key| !key.is_empty())
        .collect()
}

fn has_any_topic(record: &PhraseRecord, keys: &HashSet<String>) -> bool {
    record.topics.iter().any(|topic| keys.contains(&topic_key(topic)))
}

/// Topic key -> display label. The first spelling seen in table order wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicCatalog {
    entries: BTreeMap<String, String>,
}

impl TopicCatalog {
    pub fn from_table(table: &PhraseTable) -> Self {
        let mut entries = BTreeMap::new();

        for topic in table.records().iter().flat_map(|record| record.topics.iter()) {
            let key = topic_key(topic);
            if key.is_empty() {
                continue;
            }
            entries
                .entry(key)
                .or_insert_with(|| topic.trim().to_string());
        }

        Self { entries }
    }

    /// Sorted topic keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Display label for a raw topic, or the raw topic if it is unknown.
    pub fn display(&self, topic: &str) -> String {
        self.entries
            .get(&topic_key(topic))
            .cloned()
            .unwrap_or_else(|| topic.to_string())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
