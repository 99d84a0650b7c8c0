use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use homedir::my_home;
use serde::{Deserialize, Serialize};

use crate::phrases::{
    Lemmatizer, MorphLemmatizer, SnowballLemmatizer, DEFAULT_EXPANSION_CACHE_CAPACITY,
    DEFAULT_LEMMA_CACHE_CAPACITY,
};
use crate::semantic::{DEFAULT_MODEL, DEFAULT_THRESHOLD, DEFAULT_TOP_K};
use crate::service::ServiceOptions;

const CONFIG_FILE: &str = "config.yaml";
const BASE_PATH_ENV: &str = "PHRASEBOOK_BASE_PATH";

const DEFAULT_SOURCES: [&str; 3] = [
    "https://raw.githubusercontent.com/skatzrskx55q/data-assistant-vfiziki/main/data6.xlsx",
    "https://raw.githubusercontent.com/skatzrsk/semantic-assistant/main/data21.xlsx",
    "https://raw.githubusercontent.com/skatzrsk/semantic-assistant/main/data31.xlsx",
];
const DEFAULT_AUTH_TOKEN_ENV: &str = "GITHUB_TOKEN";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STEMMER_LANGUAGE: &str = "russian";

/// Word analyzer used for keyword matching
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LemmatizerKind {
    /// Dictionary normal forms (Russian)
    #[default]
    Morph,
    /// Snowball stems in `stemmer_language`
    Snowball,
}

/// Configuration for semantic search functionality
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchConfig {
    /// Model name for embeddings (e.g., "paraphrase-multilingual-MiniLM-L12-v2")
    #[serde(default = "default_semantic_model")]
    pub model: String,

    /// Default similarity threshold [0.0, 1.0]
    #[serde(default = "default_semantic_threshold")]
    pub default_threshold: f32,

    /// Rows considered before deduplication
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for SemanticSearchConfig {
    fn default() -> Self {
        Self {
            model: default_semantic_model(),
            default_threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn default_semantic_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_semantic_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet URLs or local paths, loaded in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Environment variable holding an optional access token for remote sources
    #[serde(default = "default_auth_token_env")]
    pub auth_token_env: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub semantic_search: SemanticSearchConfig,

    #[serde(default = "default_lemma_cache_capacity")]
    pub lemma_cache_capacity: usize,

    #[serde(default = "default_expansion_cache_capacity")]
    pub expansion_cache_capacity: usize,

    #[serde(default)]
    pub lemmatizer: LemmatizerKind,

    /// Only used by the snowball lemmatizer
    #[serde(default = "default_stemmer_language")]
    pub stemmer_language: String,

    /// Words treated as interchangeable by keyword search
    #[serde(default)]
    pub synonym_groups: Vec<Vec<String>>,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            auth_token_env: default_auth_token_env(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            semantic_search: SemanticSearchConfig::default(),
            lemma_cache_capacity: DEFAULT_LEMMA_CACHE_CAPACITY,
            expansion_cache_capacity: DEFAULT_EXPANSION_CACHE_CAPACITY,
            lemmatizer: LemmatizerKind::default(),
            stemmer_language: default_stemmer_language(),
            synonym_groups: vec![],
            base_path: PathBuf::new(),
        }
    }
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_auth_token_env() -> String {
    DEFAULT_AUTH_TOKEN_ENV.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_lemma_cache_capacity() -> usize {
    DEFAULT_LEMMA_CACHE_CAPACITY
}

fn default_expansion_cache_capacity() -> usize {
    DEFAULT_EXPANSION_CACHE_CAPACITY
}

fn default_stemmer_language() -> String {
    DEFAULT_STEMMER_LANGUAGE.to_string()
}

/// `PHRASEBOOK_BASE_PATH`, or `~/.local/share/phrasebook`.
pub fn base_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var(BASE_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let home = my_home()
        .context("Could not determine home directory")?
        .context("Home directory path is empty")?;

    Ok(home.join(".local/share/phrasebook"))
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.sources.is_empty() {
            bail!("sources must list at least one spreadsheet");
        }

        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than 0");
        }

        let sem = &self.semantic_search;
        if !(0.0..=1.0).contains(&sem.default_threshold) {
            bail!(
                "semantic_search.default_threshold must be between 0.0 and 1.0, got {}",
                sem.default_threshold
            );
        }

        if sem.top_k == 0 {
            bail!("semantic_search.top_k must be greater than 0");
        }

        if self.lemma_cache_capacity == 0 {
            bail!("lemma_cache_capacity must be greater than 0");
        }

        if self.expansion_cache_capacity == 0 {
            bail!("expansion_cache_capacity must be greater than 0");
        }

        if self.lemmatizer == LemmatizerKind::Snowball {
            SnowballLemmatizer::new(&self.stemmer_language)?;
        }

        for (idx, group) in self.synonym_groups.iter().enumerate() {
            if group.iter().all(|word| word.trim().is_empty()) {
                let idx = idx + 1;
                bail!("synonym group #{idx} is empty");
            }
        }

        Ok(())
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(&base_path()?)
    }

    pub fn load_with(base_path: &Path) -> anyhow::Result<Self> {
        let config_path = base_path.join(CONFIG_FILE);

        // create new if does not exist
        if !config_path.exists() {
            std::fs::create_dir_all(base_path)
                .with_context(|| format!("failed to create {}", base_path.display()))?;
            std::fs::write(&config_path, serde_yml::to_string(&Self::default())?)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str)
            .with_context(|| format!("{} is malformed", config_path.display()))?;

        config.base_path = base_path.to_path_buf();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(self.base_path.join(CONFIG_FILE), config_str)?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn build_lemmatizer(&self) -> anyhow::Result<Box<dyn Lemmatizer>> {
        Ok(match self.lemmatizer {
            LemmatizerKind::Morph => Box::new(MorphLemmatizer::russian()),
            LemmatizerKind::Snowball => Box::new(SnowballLemmatizer::new(&self.stemmer_language)?),
        })
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            lemma_cache_capacity: self.lemma_cache_capacity,
            expansion_cache_capacity: self.expansion_cache_capacity,
            synonym_groups: self.synonym_groups.clone(),
        }
    }
}
