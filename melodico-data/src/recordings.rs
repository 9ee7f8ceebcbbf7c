//! HTTP client for the recording-search endpoint of the metadata catalogue.

use std::time::Duration;

use log::debug;
use melodico_core::{Recording, RecordingSource};
use reqwest::Client;
use tokio::runtime::Runtime;

use crate::error::{ClientBuildError, TransportError, convert_reqwest_error};
use crate::pacing::{MonotonicPacing, Pacing, RateGate};
use crate::wire::RecordingSearchResponse;

const DEFAULT_ENDPOINT: &str = "https://musicbrainz.org/ws/2/recording/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INTERVAL_MS: u64 = 1100;

/// Configuration for [`RecordingClient`].
#[derive(Debug, Clone)]
pub struct RecordingClientConfig {
    /// Recording-search endpoint.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Minimum spacing between consecutive requests.
    pub request_interval: Duration,
}

impl Default for RecordingClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: crate::knowledge::DEFAULT_USER_AGENT.to_owned(),
            request_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

impl RecordingClientConfig {
    /// Override the search endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
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

    /// Set the minimum spacing between requests.
    #[must_use]
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }
}

/// Searches the catalogue for recordings, one rate-limited request at a
/// time, and returns the first match.
pub struct RecordingClient<P: Pacing = MonotonicPacing> {
    client: Client,
    runtime: Runtime,
    config: RecordingClientConfig,
    gate: RateGate<P>,
}

impl std::fmt::Debug for RecordingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecordingClient<MonotonicPacing> {
    /// Construct a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(RecordingClientConfig::default())
    }

    /// Construct a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: RecordingClientConfig) -> Result<Self, ClientBuildError> {
        let gate = RateGate::new(config.request_interval);
        Self::with_gate(config, gate)
    }
}

impl<P: Pacing> RecordingClient<P> {
    /// Construct a client over an injected [`RateGate`], letting tests
    /// observe pacing without real sleeps.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_gate(
        config: RecordingClientConfig,
        gate: RateGate<P>,
    ) -> Result<Self, ClientBuildError> {
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
            gate,
        })
    }

    fn request_first(
        &self,
        search_query: &str,
    ) -> Result<Option<Recording>, TransportError> {
        let url = self.config.endpoint.as_str();
        let query = [
            ("fmt", "json"),
            ("query", search_query),
            ("limit", "1"),
            ("inc", "releases"),
        ];
        self.runtime.block_on(async {
            let response = self
                .client
                .get(url)
                .query(&query)
                .send()
                .await
                .map_err(|err| convert_reqwest_error(err, url))?
                .error_for_status()
                .map_err(|err| convert_reqwest_error(err, url))?;
            let parsed: RecordingSearchResponse =
                response
                    .json()
                    .await
                    .map_err(|source| TransportError::Decode {
                        url: url.to_owned(),
                        source,
                    })?;
            Ok(parsed.into_first())
        })
    }
}

/// Assemble the catalogue's search query for a title and optional artist.
pub(crate) fn search_query(title: &str, artist: Option<&str>) -> String {
    let mut query = format!("recording:\"{title}\"");
    if let Some(artist) = artist {
        query.push_str(&format!(" AND artist:\"{artist}\""));
    }
    query
}

impl<P: Pacing> RecordingSource for RecordingClient<P> {
    fn search_recording(&mut self, title: &str, artist: Option<&str>) -> Option<Recording> {
        let query = search_query(title, artist);
        self.gate.wait();
        let outcome = self.request_first(&query);
        self.gate.complete();
        match outcome {
            Ok(recording) => recording,
            Err(err) => {
                debug!("recording search failed for {title:?}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn query_includes_artist_when_present() {
        assert_eq!(
            search_query("Song X", Some("Artist Z")),
            "recording:\"Song X\" AND artist:\"Artist Z\""
        );
        assert_eq!(search_query("Song X", None), "recording:\"Song X\"");
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = RecordingClientConfig::default()
            .with_endpoint("http://catalogue.local/recording/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_request_interval(Duration::from_millis(200));
        assert_eq!(config.endpoint, "http://catalogue.local/recording/");
        assert_eq!(config.request_interval, Duration::from_millis(200));
    }

    #[rstest]
    fn default_interval_matches_the_catalogue_policy() {
        let config = RecordingClientConfig::default();
        assert_eq!(config.request_interval, Duration::from_millis(1100));
    }
}
