//! Ordered in-memory embedding index with cosine similarity search.
//!
//! Row `i` of the index is the embedding of row `i` of the phrase table. The
//! index is built once per load and never updated in place.

/// Search result from the embedding index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Row in the phrase table
    pub row: usize,
    /// Cosine similarity score
    pub score: f32,
}

/// Embeddings stored in table row order.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    vectors: Vec<Vec<f32>>,
    /// Expected embedding dimensions (0 while empty)
    dimensions: usize,
}

impl EmbeddingIndex {
    /// Build an index from vectors in row order.
    ///
    /// Dimensions are taken from the first vector; every other vector must
    /// match.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        let mut index = Self {
            vectors: Vec::with_capacity(vectors.len()),
            dimensions,
        };

        for embedding in vectors {
            index.push(embedding)?;
        }

        Ok(index)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append the embedding of the next table row.
    pub fn push(&mut self, embedding: Vec<f32>) -> Result<(), IndexError> {
        if embedding.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: embedding.len(),
            });
        }

        self.vectors.push(embedding);
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, row: usize) -> Option<&[f32]> {
        self.vectors.get(row).map(Vec::as_slice)
    }

    /// A new index holding only the given rows, in the given order.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            vectors: rows
                .iter()
                .filter_map(|&row| self.vectors.get(row).cloned())
                .collect(),
            dimensions: self.dimensions,
        }
    }

    /// Cosine similarity of `query` against every row, in row order.
    ///
    /// Rows with a zero-norm embedding score 0.0, and so does every row for a
    /// zero-norm query.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<f32>, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let query_norm = Self::l2_norm(query);
        if query_norm < f32::EPSILON {
            return Ok(vec![0.0; self.vectors.len()]);
        }

        Ok(self
            .vectors
            .iter()
            .map(|target| Self::cosine_similarity(query, target, query_norm))
            .collect())
    }

    /// Search for similar rows using cosine similarity.
    ///
    /// # Arguments
    /// * `query` - The query embedding vector
    /// * `threshold` - Minimum similarity score, inclusive
    /// * `limit` - Maximum number of results to return
    ///
    /// # Returns
    /// Results sorted by similarity score (highest first). Equal scores keep
    /// row order.
    pub fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        if self.is_empty() {
            return Ok(vec![]);
        }

        let mut results: Vec<SearchResult> = self
            .similarities(query)?
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score >= threshold)
            .map(|(row, score)| SearchResult { row, score })
            .collect();

        // Stable sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        results.truncate(limit);

        Ok(results)
    }

    /// Compute L2 norm of a vector.
    fn l2_norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Compute cosine similarity between two vectors.
    /// Assumes query_norm is precomputed for efficiency.
    fn cosine_similarity(query: &[f32], target: &[f32], query_norm: f32) -> f32 {
        let target_norm = Self::l2_norm(target);
        if target_norm < f32::EPSILON {
            return 0.0;
        }

        let dot_product: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
        dot_product / (query_norm * target_norm)
    }
}

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Index has {vectors} vectors for {rows} table rows")]
    LengthMismatch { rows: usize, vectors: usize },
}
