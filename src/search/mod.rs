//! Query side: semantic and keyword retrieval plus result deduplication.

mod dedupe;
mod keyword;
mod semantic;

pub use dedupe::{dedupe, filter_hits_by_topics, SearchHit, UNSCORED_WEIGHT};
pub use keyword::keyword_search;
pub use semantic::semantic_search;

use crate::semantic::{EmbeddingError, IndexError};

/// Errors raised while answering a single query.
///
/// They never touch the loaded table; the next query starts clean.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}
