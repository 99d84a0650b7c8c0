//! Embedding model wrapper for fastembed.
//!
//! Provides a high-level interface for generating embeddings:
//! - Lazy model loading with configurable cache directory
//! - Batch embedding generation
//! - The [`Encoder`] seam the search code depends on, so tests can swap in
//!   a deterministic fake

use fastembed::{InitOptions, TextEmbedding};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Mutex;

/// Turns text into fixed-size dense vectors.
///
/// Implementations must be deterministic for a fixed model version.
pub trait Encoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Wrapper around fastembed's TextEmbedding model.
/// Uses a Mutex because fastembed's embed() requires &mut self.
pub struct EmbeddingModel {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

/// Error type for embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Invalid model name: {0}")]
    InvalidModel(String),
}

impl EmbeddingModel {
    /// Create a new embedding model with the given name.
    ///
    /// The model will be downloaded on first use if not cached.
    /// Models are cached in the `models/` subdirectory of `cache_dir`.
    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        let model_enum = Self::parse_model_name(model_name)?;

        let models_dir = cache_dir.join("models");
        std::fs::create_dir_all(&models_dir).map_err(|e| {
            EmbeddingError::InitFailed(format!("Failed to create models directory: {}", e))
        })?;

        let options = InitOptions::new(model_enum)
            .with_cache_dir(models_dir)
            .with_show_download_progress(true);

        let mut model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        // Get model dimensions by embedding a test string
        let dimensions = Self::probe_dimensions(&mut model)?;

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
            dimensions,
        })
    }

    /// Get the model name
    pub fn name(&self) -> &str {
        &self.model_name
    }

    /// Get the embedding dimensions for this model
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Generate an embedding for a single text.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut model = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Failed to acquire model lock: {}", e))
        })?;

        let embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))?;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("No embedding returned".to_string()))
    }

    /// Generate embeddings for multiple texts.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Failed to acquire model lock: {}", e))
        })?;

        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))
    }

    /// Parse model name string to fastembed enum.
    ///
    /// Phrase books are Russian, so the multilingual models come first; the
    /// English-only ones stay available for English phrase books.
    fn parse_model_name(
        name: &str,
    ) -> Result<fastembed::EmbeddingModel, EmbeddingError> {
        match name.to_lowercase().as_str() {
            "paraphrase-multilingual-minilm-l12-v2" | "paraphrasemlminilml12v2" => {
                Ok(fastembed::EmbeddingModel::ParaphraseMLMiniLML12V2)
            }
            "paraphrase-multilingual-minilm-l12-v2-q" | "paraphrasemlminilml12v2q" => {
                Ok(fastembed::EmbeddingModel::ParaphraseMLMiniLML12V2Q)
            }
            "paraphrase-multilingual-mpnet-base-v2" | "paraphrasemlmpnetbasev2" => {
                Ok(fastembed::EmbeddingModel::ParaphraseMLMpnetBaseV2)
            }
            "multilingual-e5-small" | "multilinguale5small" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Small)
            }
            "multilingual-e5-base" | "multilinguale5base" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Base)
            }
            "multilingual-e5-large" | "multilinguale5large" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Large)
            }
            "all-minilm-l6-v2" | "allminiml6v2" => {
                Ok(fastembed::EmbeddingModel::AllMiniLML6V2)
            }
            "bge-small-en-v1.5" | "bgesmallenv15" => {
                Ok(fastembed::EmbeddingModel::BGESmallENV15)
            }
            "bge-base-en-v1.5" | "bgebaseenv15" => {
                Ok(fastembed::EmbeddingModel::BGEBaseENV15)
            }
            _ => Err(EmbeddingError::InvalidModel(format!(
                "Unknown model: {}. Supported models: paraphrase-multilingual-MiniLM-L12-v2 (-q), paraphrase-multilingual-mpnet-base-v2, multilingual-e5-small/base/large, all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5",
                name
            ))),
        }
    }

    /// Probe the model to determine embedding dimensions.
    fn probe_dimensions(model: &mut TextEmbedding) -> Result<usize, EmbeddingError> {
        let test_embeddings = model
            .embed(vec!["test"], None)
            .map_err(|e| EmbeddingError::InitFailed(format!("Failed to probe dimensions: {}", e)))?;

        test_embeddings
            .first()
            .map(|v| v.len())
            .ok_or_else(|| EmbeddingError::InitFailed("Model returned no embedding".to_string()))
    }
}

impl Encoder for EmbeddingModel {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_batch(texts)
    }
}

/// An [`EmbeddingModel`] that is created on first use.
///
/// Loading a model means a download on the first run, so nothing is touched
/// until a non-empty batch or a query actually needs a vector. Initialization
/// happens at most once; a failed attempt is retried on the next call.
pub struct LazyEmbeddingModel {
    model_name: String,
    cache_dir: PathBuf,
    model: OnceCell<EmbeddingModel>,
}

impl LazyEmbeddingModel {
    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        // Fail fast on typos in config instead of at first query
        EmbeddingModel::parse_model_name(model_name)?;

        Ok(Self {
            model_name: model_name.to_string(),
            cache_dir,
            model: OnceCell::new(),
        })
    }

    #[cfg(test)]
    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    fn model(&self) -> Result<&EmbeddingModel, EmbeddingError> {
        self.model.get_or_try_init(|| {
            log::info!("Initializing embedding model '{}'", self.model_name);
            let model = EmbeddingModel::new(&self.model_name, self.cache_dir.clone())?;
            log::info!(
                "Embedding model '{}' ready ({} dimensions)",
                model.name(),
                model.dimensions()
            );
            Ok(model)
        })
    }
}

impl Encoder for LazyEmbeddingModel {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.model()?.embed(text)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.model()?.embed_batch(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require model download - run with --ignored
    #[test]
    #[ignore = "requires model download"]
    fn test_model_creation() {
        let temp_dir = std::env::temp_dir().join("phrasebook-embed-test");
        let model = EmbeddingModel::new("paraphrase-multilingual-MiniLM-L12-v2", temp_dir.clone());
        assert!(model.is_ok());

        let model = model.unwrap();
        assert_eq!(model.name(), "paraphrase-multilingual-MiniLM-L12-v2");
        assert_eq!(model.dimensions(), 384);

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_similar_russian_phrases_score_higher() {
        let temp_dir = std::env::temp_dir().join("phrasebook-embed-test-sim");
        let model =
            EmbeddingModel::new("paraphrase-multilingual-MiniLM-L12-v2", temp_dir.clone()).unwrap();

        let texts = vec![
            "хочу погасить кредит".to_string(),
            "как закрыть займ".to_string(),
            "какая сегодня погода".to_string(),
        ];
        let vectors = model.embed_batch(&texts).unwrap();
        let index = crate::semantic::EmbeddingIndex::from_vectors(vectors).unwrap();

        let query = model.embed("погашение кредита").unwrap();
        let scores = index.similarities(&query).unwrap();
        assert!(scores[0] > scores[2]);
        assert!(scores[1] > scores[2]);

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_invalid_model_name() {
        let temp_dir = std::env::temp_dir().join("phrasebook-embed-invalid");
        let result = EmbeddingModel::new("nonexistent-model", temp_dir);
        assert!(matches!(result, Err(EmbeddingError::InvalidModel(_))));
    }

    #[test]
    fn test_lazy_model_validates_name_without_loading() {
        let temp_dir = std::env::temp_dir().join("phrasebook-embed-lazy");
        let lazy = LazyEmbeddingModel::new("multilingual-e5-small", temp_dir.clone()).unwrap();
        assert!(!lazy.is_initialized());

        let invalid = LazyEmbeddingModel::new("nonexistent-model", temp_dir);
        assert!(matches!(invalid, Err(EmbeddingError::InvalidModel(_))));
    }

    #[test]
    fn test_lazy_model_skips_empty_batch() {
        let temp_dir = std::env::temp_dir().join("phrasebook-embed-lazy-empty");
        let lazy = LazyEmbeddingModel::new("all-MiniLM-L6-v2", temp_dir).unwrap();

        let vectors = lazy.encode_batch(&[]).unwrap();
        assert!(vectors.is_empty());
        assert!(!lazy.is_initialized());
    }
}
