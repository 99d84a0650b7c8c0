//! Phrase templates and their comparable forms.

pub mod expand;
pub mod normalize;
mod record;
mod synonyms;

pub use expand::{expand, ExpansionCache, DEFAULT_EXPANSION_CACHE_CAPACITY};
pub use normalize::{
    normalize, tokenize, LemmaCache, Lemmatizer, LemmatizerError, MorphLemmatizer,
    SnowballLemmatizer, DEFAULT_LEMMA_CACHE_CAPACITY,
};
pub use record::{topic_key, PhraseRecord, PhraseTable, TopicCatalog};
pub use synonyms::SynonymTable;
