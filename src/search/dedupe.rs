//! Search hits and their deduplication.

use std::collections::HashMap;

use serde::Serialize;

/// Score an unscored hit competes with during deduplication.
pub const UNSCORED_WEIGHT: f32 = 1.0;

/// One row of a search result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    /// Semantic hit with its cosine similarity
    Scored {
        score: f32,
        phrase: String,
        topics: Vec<String>,
        comment: String,
    },
    /// Keyword hit
    Unscored {
        phrase: String,
        topics: Vec<String>,
        comment: String,
    },
}

impl SearchHit {
    pub fn phrase(&self) -> &str {
        match self {
            SearchHit::Scored { phrase, .. } | SearchHit::Unscored { phrase, .. } => phrase,
        }
    }

    pub fn topics(&self) -> &[String] {
        match self {
            SearchHit::Scored { topics, .. } | SearchHit::Unscored { topics, .. } => topics,
        }
    }

    pub fn comment(&self) -> &str {
        match self {
            SearchHit::Scored { comment, .. } | SearchHit::Unscored { comment, .. } => comment,
        }
    }

    pub fn score(&self) -> f32 {
        match self {
            SearchHit::Scored { score, .. } => *score,
            SearchHit::Unscored { .. } => UNSCORED_WEIGHT,
        }
    }

    pub fn topics_mut(&mut self) -> &mut Vec<String> {
        match self {
            SearchHit::Scored { topics, .. } | SearchHit::Unscored { topics, .. } => topics,
        }
    }
}

/// Keep one hit per display phrase.
///
/// The hit with the strictly highest score wins and takes the slot where its
/// phrase first appeared; on equal scores the earlier hit stays.
pub fn dedupe(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut best: Vec<SearchHit> = Vec::with_capacity(hits.len());

    for hit in hits {
        match slots.get(hit.phrase()) {
            Some(&slot) => {
                if hit.score() > best[slot].score() {
                    best[slot] = hit;
                }
            }
            None => {
                slots.insert(hit.phrase().to_string(), best.len());
                best.push(hit);
            }
        }
    }

    best
}

/// Keep hits tagged with at least one of `topics` (raw labels, exact match).
/// An empty selection keeps everything.
pub fn filter_hits_by_topics(hits: Vec<SearchHit>, topics: &[String]) -> Vec<SearchHit> {
    if topics.is_empty() {
        return hits;
    }

    hits.into_iter()
        .filter(|hit| hit.topics().iter().any(|topic| topics.contains(topic)))
        .collect()
}
