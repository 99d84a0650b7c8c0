//! Synonym groups for keyword matching.
//!
//! Each configured group is lemmatized once; every lemma in the group maps to
//! the whole group. A lemma outside every group is only synonymous with
//! itself.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::normalize::{normalize, LemmaCache};

#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    groups: HashMap<String, Arc<BTreeSet<String>>>,
}

impl SynonymTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the table from raw word groups.
    ///
    /// A lemma listed in several groups belongs to the last one.
    pub fn from_groups(groups: &[Vec<String>], lemmas: &LemmaCache) -> Self {
        let mut table = HashMap::new();

        for group in groups {
            let group_lemmas: BTreeSet<String> = group
                .iter()
                .map(|word| lemmas.lemmatize(&normalize(word)))
                .filter(|lemma| !lemma.is_empty())
                .collect();

            if group_lemmas.len() < 2 {
                log::debug!("synonym group {group:?} collapses to a single lemma");
            }

            let group_lemmas = Arc::new(group_lemmas);
            for lemma in group_lemmas.iter() {
                table.insert(lemma.clone(), group_lemmas.clone());
            }
        }

        Self { groups: table }
    }

    /// Whether `phrase_lemma` covers `query_lemma`.
    pub fn covers(&self, phrase_lemma: &str, query_lemma: &str) -> bool {
        match self.groups.get(phrase_lemma) {
            Some(group) => group.contains(query_lemma),
            None => phrase_lemma == query_lemma,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
