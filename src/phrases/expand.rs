//! Phrase template expansion.
//!
//! A template compactly encodes several literal phrases:
//! - `|` separates independent alternatives (`привет|здравствуйте`)
//! - `/` joins word choices inside an alternative (`хочу/могу оплатить`)
//!
//! Every alternative expands on its own; choice groups inside one alternative
//! combine as a cartesian product.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;

/// Words or hyphenated words joined by one or more `/`.
static CHOICE_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[\w-]+(?:/[\w-]+)+\b").expect("Failed to compile choice group regex")
});

/// Default number of templates kept in the expansion cache
pub const DEFAULT_EXPANSION_CACHE_CAPACITY: usize = 5_000;

/// Expand a template into every literal phrase it denotes.
///
/// Output order follows alternative order, then the product enumeration in
/// order of appearance (the first choice group varies slowest). Empty
/// combinations are dropped, so `expand("")` is empty.
pub fn expand(template: &str) -> Vec<String> {
    template
        .trim()
        .split('|')
        .flat_map(|segment| expand_segment(segment.trim()))
        .collect()
}

fn expand_segment(segment: &str) -> Vec<String> {
    let mut parts: Vec<Vec<&str>> = Vec::new();
    let mut last_idx = 0;

    for m in CHOICE_GROUP_REGEX.find_iter(segment) {
        if m.start() > last_idx {
            let literal = segment[last_idx..m.start()].trim();
            if !literal.is_empty() {
                parts.push(vec![literal]);
            }
        }

        let options: Vec<&str> = m
            .as_str()
            .split('/')
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .collect();
        parts.push(options);
        last_idx = m.end();
    }

    if last_idx < segment.len() {
        let literal = segment[last_idx..].trim();
        if !literal.is_empty() {
            parts.push(vec![literal]);
        }
    }

    cartesian_product(&parts)
        .into_iter()
        .map(|combination| collapse_spaces(&combination.join(" ")))
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

fn cartesian_product<'a>(parts: &[Vec<&'a str>]) -> Vec<Vec<&'a str>> {
    let mut combinations: Vec<Vec<&'a str>> = vec![vec![]];

    for options in parts {
        let mut next = Vec::with_capacity(combinations.len() * options.len());
        for prefix in &combinations {
            for option in options {
                let mut combination = prefix.clone();
                combination.push(option);
                next.push(combination);
            }
        }
        combinations = next;
    }

    combinations
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Memoizing wrapper around [`expand`].
///
/// Templates repeat across sources and reloads; expansion is pure so the
/// cached value is always the one `expand` would return.
pub struct ExpansionCache {
    cache: Mutex<LruCache<String, Vec<String>>>,
}

impl ExpansionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn expand(&self, template: &str) -> Vec<String> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(phrases) = cache.get(template) {
                return phrases.clone();
            }
        }

        let phrases = expand(template);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(template.to_string(), phrases.clone());
        }

        phrases
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl Default for ExpansionCache {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_CACHE_CAPACITY)
    }
}
