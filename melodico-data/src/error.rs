//! Error types for the remote clients.

use std::io;

use thiserror::Error;

/// Transport-level failures encountered while issuing HTTP requests.
///
/// These are recovered at the client boundary and logged; callers of the
/// source traits only ever observe the absence sentinel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request failed before a status was available.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error reported by the transport.
        #[source]
        source: reqwest::Error,
    },
    /// The response body was not the expected JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },
}

pub(crate) fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        source: error,
    }
}

/// Client construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },
    /// Building the Tokio runtime failed.
    #[error("failed to build Tokio runtime: {source}")]
    Runtime {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
