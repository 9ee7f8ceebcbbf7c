//! Facade crate for the melodico enrichment engine.
//!
//! This crate re-exports the core domain types, the remote clients, the
//! region-inference gazetteer and the row imputers, so applications can
//! depend on a single crate.

#![forbid(unsafe_code)]

pub use melodico_core::{
    ArtistAuditEntry, ChangeSet, ClaimValue, Dataset, EntityId, EntityRecord, EntitySource,
    LabelResolver, LanguagePriority, NormaliseRule, PropertySpec, PropertyTable, Recording,
    RecordingSource, RegionInfo, RegionProvenance, Release, Row, TrackAuditEntry, Value,
    apply_derived, normalise_date,
};

pub use melodico_data::{
    ClientBuildError, KnowledgeClient, KnowledgeClientConfig, RateGate, RecordingClient,
    RecordingClientConfig, TransportError,
};

pub use melodico_gazetteer::{DEFAULT_MARGIN, RegionVocabulary, infer_region, rank_mentions};

pub use melodico_imputer::{
    ArtistImputer, ArtistImputerConfig, AuditLog, ImputeError, ImputeSummary, TrackField,
    TrackImputer, TrackImputerConfig,
};
