//! Embedding-similarity search over a loaded phrase table.

use crate::phrases::{normalize, PhraseTable};
use crate::semantic::Encoder;

use super::dedupe::{dedupe, SearchHit};
use super::SearchError;

/// Rank table rows by cosine similarity to `query`.
///
/// Rows below `threshold` are dropped, the rest sorted by score (ties keep
/// table order) and cut to `top_k` before deduplication, so fewer than
/// `top_k` distinct phrases may come back.
pub fn semantic_search(
    encoder: &dyn Encoder,
    query: &str,
    table: &PhraseTable,
    top_k: usize,
    threshold: f32,
) -> Result<Vec<SearchHit>, SearchError> {
    if table.is_empty() || top_k == 0 {
        return Ok(vec![]);
    }

    let query = normalize(query);
    let query_embedding = encoder.encode(&query)?;
    let results = table.index().search(&query_embedding, threshold, top_k)?;

    let hits = results
        .into_iter()
        .filter_map(|result| {
            table.get(result.row).map(|record| SearchHit::Scored {
                score: result.score,
                phrase: record.phrase_display.clone(),
                topics: record.topics.clone(),
                comment: record.comment.clone(),
            })
        })
        .collect();

    Ok(dedupe(hits))
}
