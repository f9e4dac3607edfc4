//! Meilisearch-backed dictionary index.
//!
//! The index is a disposable mirror of `dictionary_entries` used only for fuzzy
//! lookup. Meilisearch acknowledges writes as enqueued tasks, so every write
//! waits for its task and only counts as confirmed once the task succeeded.
//!
//! Task waits are bounded by the configured timeout, and callers wrap each call
//! in their own `tokio::time::timeout` as well. An unreachable index must fail
//! fast so the caller can fall back to Postgres.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use meilisearch_sdk::client::Client;
use meilisearch_sdk::indexes::Index;
use meilisearch_sdk::search::SearchResults;
use meilisearch_sdk::settings::Settings;
use meilisearch_sdk::task_info::TaskInfo;
use tracing::{debug, info};

use crate::common::DictionaryEntryId;
use crate::config::SearchIndexConfig;
use crate::kernel::{BaseSearchIndex, SearchDocument};

pub const FIELD_ID: &str = "id";
pub const FIELD_WORD: &str = "word";
pub const FIELD_DEFINITION: &str = "definition";

const TASK_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct MeilisearchIndex {
    client: Client,
    index_name: String,
    task_timeout: Duration,
}

/// Word matches outrank definition matches.
fn index_settings() -> Settings {
    Settings::new()
        .with_searchable_attributes([FIELD_WORD, FIELD_DEFINITION])
        .with_displayed_attributes(["*"])
        .with_ranking_rules(["words", "typo", "proximity", "attribute", "exactness"])
}

impl MeilisearchIndex {
    pub fn new(config: &SearchIndexConfig) -> Result<Self> {
        let host = config
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("MEILISEARCH_URL is not configured"))?;
        url::Url::parse(host).context("MEILISEARCH_URL is not a valid URL")?;

        let client = Client::new(host.trim_end_matches('/'), config.api_key.as_deref())
            .context("Failed to create Meilisearch client")?;

        Ok(Self {
            client,
            index_name: config.index_name.clone(),
            task_timeout: config.timeout,
        })
    }

    fn index(&self) -> Index {
        self.client.index(&self.index_name)
    }

    /// Wait for an enqueued task and turn a failed or canceled task into an error.
    async fn confirm(&self, task: TaskInfo) -> Result<()> {
        let task = task
            .wait_for_completion(&self.client, Some(TASK_POLL_INTERVAL), Some(self.task_timeout))
            .await?;
        if task.is_failure() {
            bail!("Meilisearch task failed: {:?}", task);
        }
        Ok(())
    }
}

#[async_trait]
impl BaseSearchIndex for MeilisearchIndex {
    async fn ensure_index(&self) -> Result<()> {
        if self.client.get_index(&self.index_name).await.is_err() {
            let task = self
                .client
                .create_index(&self.index_name, Some(FIELD_ID))
                .await?;
            self.confirm(task).await?;
            info!(index = %self.index_name, "Created search index");
        }

        let task = self.index().set_settings(&index_settings()).await?;
        self.confirm(task).await?;
        debug!(index = %self.index_name, "Search index settings applied");
        Ok(())
    }

    async fn upsert(&self, document: &SearchDocument) -> Result<()> {
        let task = self
            .index()
            .add_or_replace(&[document], Some(FIELD_ID))
            .await?;
        self.confirm(task).await
    }

    async fn delete(&self, id: DictionaryEntryId) -> Result<()> {
        let task = self.index().delete_document(id.to_string()).await?;
        self.confirm(task).await
    }

    async fn clear(&self) -> Result<()> {
        let task = self.index().delete_all_documents().await?;
        self.confirm(task).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchDocument>> {
        let index = self.index();
        let mut search = index.search();
        search.with_query(query).with_limit(limit);

        let results: SearchResults<SearchDocument> = search.execute().await?;
        Ok(results.hits.into_iter().map(|hit| hit.result).collect())
    }
}

/// Stand-in used when no search index is configured.
///
/// Every call fails, so reads always take the Postgres fallback and entries
/// stay unsynced until an index is configured and a rebuild runs.
pub struct DisabledSearchIndex;

#[async_trait]
impl BaseSearchIndex for DisabledSearchIndex {
    async fn ensure_index(&self) -> Result<()> {
        bail!("search index is disabled")
    }

    async fn upsert(&self, _document: &SearchDocument) -> Result<()> {
        bail!("search index is disabled")
    }

    async fn delete(&self, _id: DictionaryEntryId) -> Result<()> {
        bail!("search index is disabled")
    }

    async fn clear(&self) -> Result<()> {
        bail!("search index is disabled")
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchDocument>> {
        bail!("search index is disabled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>) -> SearchIndexConfig {
        SearchIndexConfig {
            url: url.map(String::from),
            ..SearchIndexConfig::default()
        }
    }

    #[test]
    fn test_new_requires_valid_url() {
        assert!(MeilisearchIndex::new(&config(None)).is_err());
        assert!(MeilisearchIndex::new(&config(Some("not a url"))).is_err());
        assert!(MeilisearchIndex::new(&config(Some("http://localhost:7700/"))).is_ok());
    }

    #[test]
    fn test_settings_search_word_before_definition() {
        let settings = index_settings();
        assert_eq!(
            settings.searchable_attributes,
            Some(vec![FIELD_WORD.to_string(), FIELD_DEFINITION.to_string()])
        );
        assert_eq!(
            settings.ranking_rules.as_ref().map(|rules| rules[3].as_str()),
            Some("attribute")
        );
    }

    #[tokio::test]
    async fn test_disabled_index_always_fails() {
        let index = DisabledSearchIndex;
        assert!(index.search("hello", 10).await.is_err());
        assert!(index.delete(DictionaryEntryId::new()).await.is_err());
        assert!(index.clear().await.is_err());
    }
}
