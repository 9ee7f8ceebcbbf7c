//! Remote clients for the melodico enrichment engine.
//!
//! Two HTTP clients implement the source traits from `melodico-core`:
//! [`KnowledgeClient`] talks to the encyclopedia and knowledge-graph APIs
//! (identifier lookup, entity data, plain-text extracts) and
//! [`RecordingClient`] queries the recording-search endpoint of the music
//! metadata catalogue, spaced by a [`RateGate`].
//!
//! # Architecture
//!
//! The source traits are synchronous so the row loop stays a plain,
//! single-threaded iteration. Each client bridges reqwest's async calls to
//! that surface by blocking on an owned current-thread Tokio runtime, the
//! same pattern the engine uses for every outbound integration. Clients must
//! therefore be driven from synchronous code, not from inside an async
//! context.
//!
//! Transport and decoding failures never escape this crate as errors: each
//! public operation recovers locally and returns its absence sentinel, with
//! the failure recorded at debug level.

#![forbid(unsafe_code)]

mod error;
mod knowledge;
mod pacing;
mod recordings;
mod wire;

pub use error::{ClientBuildError, TransportError};
pub use knowledge::{DEFAULT_USER_AGENT, KnowledgeClient, KnowledgeClientConfig};
pub use pacing::{MonotonicPacing, Pacing, RateGate};
pub use recordings::{RecordingClient, RecordingClientConfig};
