//! HTTP client for the encyclopedia and knowledge-graph APIs.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use melodico_core::{EntityId, EntityRecord, EntitySource, LabelResolver, LanguagePriority};
use reqwest::Client;
use tokio::runtime::Runtime;

use crate::error::{ClientBuildError, TransportError, convert_reqwest_error};
use crate::wire::{EntityEnvelope, ExtractResponse, PagePropsResponse};

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "melodico-enrichment/0.1";

const DEFAULT_SEARCH_ENDPOINT: &str = "https://it.wikipedia.org/w/api.php";
const DEFAULT_ENTITY_ENDPOINT: &str = "https://www.wikidata.org/wiki/Special:EntityData";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`KnowledgeClient`].
#[derive(Debug, Clone)]
pub struct KnowledgeClientConfig {
    /// Endpoint of the page-props lookup API.
    pub search_endpoint: String,
    /// Base endpoint of the entity-data API; `/{id}.json` is appended.
    pub entity_endpoint: String,
    /// Fixed endpoint for text extracts. When `None`, the endpoint is
    /// derived from the requested language
    /// (`https://{language}.wikipedia.org/w/api.php`).
    pub text_endpoint: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for KnowledgeClientConfig {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_owned(),
            entity_endpoint: DEFAULT_ENTITY_ENDPOINT.to_owned(),
            text_endpoint: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl KnowledgeClientConfig {
    /// Override the page-props lookup endpoint.
    #[must_use]
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// Override the entity-data endpoint.
    #[must_use]
    pub fn with_entity_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.entity_endpoint = endpoint.into();
        self
    }

    /// Pin the text-extract endpoint instead of deriving it per language.
    #[must_use]
    pub fn with_text_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.text_endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches and caches entity records, labels and plain-text summaries.
///
/// Every public operation recovers transport and decoding failures locally
/// and returns its absence sentinel; absence is an expected outcome for
/// callers, not an exception. The four caches (title to id, entity by id,
/// label by id, text by language and title) belong to this instance, grow
/// without bound and are never evicted — batches are small enough that
/// eviction would be wasted machinery, which a larger deployment would need
/// to revisit.
pub struct KnowledgeClient {
    client: Client,
    runtime: Runtime,
    config: KnowledgeClientConfig,
    title_ids: BTreeMap<String, EntityId>,
    entities: BTreeMap<EntityId, EntityRecord>,
    labels: BTreeMap<EntityId, Option<String>>,
    texts: BTreeMap<(String, String), String>,
}

impl std::fmt::Debug for KnowledgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeClient")
            .field("config", &self.config)
            .field("cached_entities", &self.entities.len())
            .field("cached_labels", &self.labels.len())
            .field("cached_texts", &self.texts.len())
            .finish_non_exhaustive()
    }
}

impl KnowledgeClient {
    /// Construct a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(KnowledgeClientConfig::default())
    }

    /// Construct a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: KnowledgeClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|source| ClientBuildError::HttpClient { source })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| ClientBuildError::Runtime { source })?;
        Ok(Self {
            client,
            runtime,
            config,
            title_ids: BTreeMap::new(),
            entities: BTreeMap::new(),
            labels: BTreeMap::new(),
            texts: BTreeMap::new(),
        })
    }

    fn entity_url(&self, id: &EntityId) -> String {
        format!(
            "{}/{}.json",
            self.config.entity_endpoint.trim_end_matches('/'),
            id
        )
    }

    fn text_url(&self, language: &str) -> String {
        self.config.text_endpoint.clone().unwrap_or_else(|| {
            format!("https://{language}.wikipedia.org/w/api.php")
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        self.runtime.block_on(async {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|err| convert_reqwest_error(err, url))?
                .error_for_status()
                .map_err(|err| convert_reqwest_error(err, url))?;
            response
                .json::<T>()
                .await
                .map_err(|source| TransportError::Decode {
                    url: url.to_owned(),
                    source,
                })
        })
    }

    fn request_identifier(&self, title: &str) -> Result<Option<EntityId>, TransportError> {
        let query = [
            ("action", "query"),
            ("titles", title),
            ("prop", "pageprops"),
            ("format", "json"),
        ];
        let response: PagePropsResponse = self.get_json(&self.config.search_endpoint, &query)?;
        Ok(response.wikibase_item())
    }

    fn request_entity(&self, id: &EntityId) -> Result<Option<EntityRecord>, TransportError> {
        let url = self.entity_url(id);
        let envelope: EntityEnvelope = self.get_json(&url, &[])?;
        Ok(envelope.into_record(id))
    }

    fn request_text(&self, title: &str, language: &str) -> Result<String, TransportError> {
        let url = self.text_url(language);
        let query = [
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("titles", title),
            ("format", "json"),
        ];
        let response: ExtractResponse = self.get_json(&url, &query)?;
        Ok(response.into_text())
    }
}

impl LabelResolver for KnowledgeClient {
    fn resolve_label(&mut self, id: &EntityId, languages: &LanguagePriority) -> Option<String> {
        if let Some(cached) = self.labels.get(id) {
            return cached.clone();
        }
        let label = self
            .fetch_entity(id)
            .and_then(|record| record.label(languages).map(str::to_owned));
        self.labels.insert(id.clone(), label.clone());
        label
    }
}

impl EntitySource for KnowledgeClient {
    fn resolve_identifier(&mut self, title: &str) -> Option<EntityId> {
        let normalised = title.trim();
        if normalised.is_empty() {
            return None;
        }
        if let Some(hit) = self.title_ids.get(normalised) {
            return Some(hit.clone());
        }
        match self.request_identifier(normalised) {
            Ok(Some(id)) => {
                self.title_ids.insert(normalised.to_owned(), id.clone());
                Some(id)
            }
            Ok(None) => None,
            Err(err) => {
                debug!("identifier lookup failed for {normalised:?}: {err}");
                None
            }
        }
    }

    fn fetch_entity(&mut self, id: &EntityId) -> Option<EntityRecord> {
        if let Some(hit) = self.entities.get(id) {
            return Some(hit.clone());
        }
        match self.request_entity(id) {
            Ok(Some(record)) => {
                self.entities.insert(id.clone(), record.clone());
                Some(record)
            }
            Ok(None) => None,
            Err(err) => {
                debug!("entity fetch failed for {id}: {err}");
                None
            }
        }
    }

    fn fetch_text(&mut self, title: &str, language: &str) -> String {
        let normalised = title.trim();
        if normalised.is_empty() {
            return String::new();
        }
        let key = (language.to_owned(), normalised.to_owned());
        if let Some(hit) = self.texts.get(&key) {
            return hit.clone();
        }
        match self.request_text(normalised, language) {
            Ok(text) => {
                self.texts.insert(key, text.clone());
                text
            }
            Err(err) => {
                debug!("text fetch failed for {normalised:?} ({language}): {err}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = KnowledgeClientConfig::default()
            .with_search_endpoint("http://wiki.local/api.php")
            .with_entity_endpoint("http://graph.local/entities/")
            .with_text_endpoint("http://wiki.local/api.php")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.search_endpoint, "http://wiki.local/api.php");
        assert_eq!(config.entity_endpoint, "http://graph.local/entities/");
        assert_eq!(config.text_endpoint.as_deref(), Some("http://wiki.local/api.php"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn entity_url_joins_without_double_slash() {
        let client = KnowledgeClient::with_config(
            KnowledgeClientConfig::default().with_entity_endpoint("http://graph.local/entities/"),
        )
        .expect("client should build");
        let id = EntityId::parse("Q42").expect("id");
        assert_eq!(client.entity_url(&id), "http://graph.local/entities/Q42.json");
    }

    #[rstest]
    fn text_url_derives_from_language() {
        let client = KnowledgeClient::new().expect("client should build");
        assert_eq!(client.text_url("it"), "https://it.wikipedia.org/w/api.php");
        let pinned = KnowledgeClient::with_config(
            KnowledgeClientConfig::default().with_text_endpoint("http://wiki.local/api.php"),
        )
        .expect("client should build");
        assert_eq!(pinned.text_url("it"), "http://wiki.local/api.php");
    }

    #[rstest]
    fn blank_titles_short_circuit() {
        let mut client = KnowledgeClient::new().expect("client should build");
        assert!(client.resolve_identifier("   ").is_none());
        assert_eq!(client.fetch_text("", "it"), "");
    }
}
