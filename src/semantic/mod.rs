//! Dense-vector side of phrase lookup.
//!
//! - `embeddings`: Wraps fastembed for embedding generation
//! - `index`: Ordered in-memory vector index with cosine similarity search

pub mod embeddings;
mod index;

pub use embeddings::{EmbeddingError, EmbeddingModel, Encoder, LazyEmbeddingModel};
pub use index::{EmbeddingIndex, IndexError, SearchResult};

/// Default embedding model name
pub const DEFAULT_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";

/// Default similarity threshold for semantic search
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Default number of semantic hits kept before deduplication
pub const DEFAULT_TOP_K: usize = 5;
