use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use crate::{
    config::Config,
    loader::{DatasetLoader, SourceClient, SourceFetcher},
    phrases::{topic_key, PhraseTable, TopicCatalog},
    search::{filter_hits_by_topics, SearchError, SearchHit},
    semantic::LazyEmbeddingModel,
    service::PhraseService,
};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    pub threshold: f32,
    /// Selected topic keys
    pub topics: Vec<String>,
    /// Search only rows tagged with a selected topic
    pub only_in_topics: bool,
    /// Drop hits not tagged with a selected topic
    pub filter_results: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SearchOutput {
    pub semantic: Vec<SearchHit>,
    pub keyword: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct TopicEntry {
    pub key: String,
    pub display: String,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct BrowseEntry {
    pub phrase: String,
    pub topics: Vec<String>,
    pub comment: String,
}

/// A loaded phrase table plus everything needed to query it.
pub struct App {
    service: PhraseService,
    table: PhraseTable,
    catalog: TopicCatalog,
}

impl App {
    pub fn new(service: PhraseService, table: PhraseTable) -> Self {
        let catalog = TopicCatalog::from_table(&table);
        Self {
            service,
            table,
            catalog,
        }
    }

    /// Build the service from config and load every configured source.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let encoder = LazyEmbeddingModel::new(
            &config.semantic_search.model,
            config.base_path().to_path_buf(),
        )?;
        let service = PhraseService::new(
            Box::new(encoder),
            config.build_lemmatizer()?,
            config.service_options(),
        );

        let client = SourceClient::new(
            Duration::from_secs(config.fetch_timeout_secs),
            SourceClient::auth_token_from_env(&config.auth_token_env),
        )
        .context("failed to build http client")?;

        Self::load_with(service, &client, &config.sources)
    }

    pub fn load_with(
        service: PhraseService,
        fetcher: &dyn SourceFetcher,
        sources: &[String],
    ) -> anyhow::Result<Self> {
        let table = DatasetLoader::new(&service, fetcher).load_all(sources)?;
        Ok(Self::new(service, table))
    }

    #[cfg(test)]
    pub fn table(&self) -> &PhraseTable {
        &self.table
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutput, SearchError> {
        let scoped;
        let table = if request.only_in_topics && !request.topics.is_empty() {
            scoped = self.table.restrict_to_topics(&request.topics);
            &scoped
        } else {
            &self.table
        };

        if table.is_empty() {
            log::warn!("No data for the selected topics");
            return Ok(SearchOutput::default());
        }

        let semantic = self.service.semantic_search(
            &request.query,
            table,
            request.top_k,
            request.threshold,
        )?;
        let keyword = self.service.keyword_search(&request.query, table);

        let mut output = SearchOutput {
            semantic: self.with_display_topics(semantic),
            keyword: self.with_display_topics(keyword),
        };

        if request.filter_results {
            let selected = self.selected_displays(&request.topics);
            output.semantic = filter_hits_by_topics(output.semantic, &selected);
            output.keyword = filter_hits_by_topics(output.keyword, &selected);
        }

        Ok(output)
    }

    pub fn topics(&self) -> Vec<TopicEntry> {
        self.catalog
            .keys()
            .map(|key| TopicEntry {
                key: key.to_string(),
                display: self.catalog.display(key),
            })
            .collect()
    }

    pub fn browse(&self, topics: &[String]) -> Vec<BrowseEntry> {
        self.table
            .phrases_for_topics(topics)
            .into_iter()
            .map(|record| BrowseEntry {
                phrase: record.phrase_display.clone(),
                topics: self.display_topics(&record.topics),
                comment: record.comment.clone(),
            })
            .collect()
    }

    fn display_topics(&self, topics: &[String]) -> Vec<String> {
        topics.iter().map(|topic| self.catalog.display(topic)).collect()
    }

    fn with_display_topics(&self, mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
        for hit in hits.iter_mut() {
            let topics = self.display_topics(hit.topics());
            *hit.topics_mut() = topics;
        }
        hits
    }

    fn selected_displays(&self, topics: &[String]) -> Vec<String> {
        topics
            .iter()
            .map(|topic| topic_key(topic))
            .filter(|key| !key.is_empty())
            .map(|key| self.catalog.display(&key))
            .collect()
    }
}
