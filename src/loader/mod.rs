//! Loading curated phrase spreadsheets into one phrase table.
//!
//! Every source is fetched, decoded and expanded on its own; a broken source
//! is logged and skipped. The embedding index is built once over the
//! concatenated records.

pub mod sheet;
pub mod source;

use std::time::Instant;

use crate::phrases::{PhraseRecord, PhraseTable};
use crate::semantic::{EmbeddingError, EmbeddingIndex, IndexError};
use crate::service::PhraseService;

pub use sheet::{parse_sheet, Sheet, SheetError};
pub use source::{FetchError, SourceClient, SourceFetcher, SourceLocation};

const PHRASE_COLUMN: &str = "phrase";
const COMMENT_COLUMN: &str = "comment";
const TOPICS_PREFIX: &str = "topics";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("source {location} is unavailable: {source}")]
    SourceUnavailable { location: String, source: FetchError },

    #[error("source {location} is not a readable spreadsheet: {source}")]
    Unparseable { location: String, source: SheetError },

    #[error("source {location} has no column starting with \"{TOPICS_PREFIX}\"")]
    SchemaError { location: String },

    #[error("source {location} has no \"{column}\" column")]
    MissingColumn { location: String, column: &'static str },

    #[error("no source could be loaded")]
    NoSourcesLoaded,

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Spreadsheet cells that mean "nothing here".
pub fn is_blank_cell(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}

pub struct DatasetLoader<'a> {
    service: &'a PhraseService,
    fetcher: &'a dyn SourceFetcher,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(service: &'a PhraseService, fetcher: &'a dyn SourceFetcher) -> Self {
        Self { service, fetcher }
    }

    /// Records of one source, in row then variant order.
    pub fn load_source(&self, location: &str) -> Result<Vec<PhraseRecord>, LoadError> {
        log::info!("Loading source {location}");

        let bytes = self
            .fetcher
            .fetch(location)
            .map_err(|source| LoadError::SourceUnavailable {
                location: location.to_string(),
                source,
            })?;

        let sheet = parse_sheet(&bytes).map_err(|source| LoadError::Unparseable {
            location: location.to_string(),
            source,
        })?;

        let records = self.records_from_sheet(location, &sheet)?;
        log::info!(
            "Loaded {} phrase variants from {} rows of {location}",
            records.len(),
            sheet.rows.len()
        );

        Ok(records)
    }

    /// Load every source that can be loaded and index the result.
    ///
    /// Fails only when no source loads at all, or when embedding fails.
    pub fn load_all(&self, locations: &[String]) -> Result<PhraseTable, LoadError> {
        let mut records = vec![];
        let mut loaded = 0;

        for location in locations {
            match self.load_source(location) {
                Ok(source_records) => {
                    loaded += 1;
                    records.extend(source_records);
                }
                Err(err) => log::warn!("Skipping source: {err}"),
            }
        }

        if loaded == 0 {
            return Err(LoadError::NoSourcesLoaded);
        }

        let now = Instant::now();
        let texts: Vec<String> = records
            .iter()
            .map(|record| record.phrase_normalized.clone())
            .collect();
        let index = EmbeddingIndex::from_vectors(self.service.encode_batch(&texts)?)?;

        log::info!(
            "Indexed {} phrases from {loaded}/{} sources ({} dimensions) in {:?}",
            records.len(),
            locations.len(),
            index.dimensions(),
            now.elapsed()
        );

        Ok(PhraseTable::new(records, index)?)
    }

    fn records_from_sheet(
        &self,
        location: &str,
        sheet: &Sheet,
    ) -> Result<Vec<PhraseRecord>, LoadError> {
        let topic_columns = sheet.columns_with_prefix(TOPICS_PREFIX);
        if topic_columns.is_empty() {
            return Err(LoadError::SchemaError {
                location: location.to_string(),
            });
        }

        let phrase_column =
            sheet
                .column(PHRASE_COLUMN)
                .ok_or_else(|| LoadError::MissingColumn {
                    location: location.to_string(),
                    column: PHRASE_COLUMN,
                })?;
        let comment_column = sheet.column(COMMENT_COLUMN);

        let mut records = vec![];
        for (line, row) in sheet.rows.iter().enumerate() {
            let phrase = sheet::cell(row, phrase_column);
            if is_blank_cell(phrase) {
                log::debug!("{location}: row {} has no phrase", line + 1);
                continue;
            }

            let topics: Vec<String> = topic_columns
                .iter()
                .map(|&idx| sheet::cell(row, idx))
                .filter(|value| !is_blank_cell(value))
                .map(str::to_string)
                .collect();

            let comment = comment_column
                .map(|idx| sheet::cell(row, idx))
                .filter(|value| !is_blank_cell(value))
                .unwrap_or("");

            records.extend(self.service.records_for_row(phrase, &topics, comment));
        }

        Ok(records)
    }
}
