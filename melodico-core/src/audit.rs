use serde::Serialize;

use crate::row::ChangeSet;
use crate::value::Value;

/// Which resolution path produced an imputed region value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionProvenance {
    /// The structured record supplied the region directly.
    WikidataProperty,
    /// A regional hint property (residence, work location, ...) resolved to
    /// a known place.
    RegionalHint,
    /// The free-text biography heuristic produced the guess.
    WikipediaText,
}

/// Provenance-tagged region resolution outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    /// The region that was applied.
    pub value: String,
    /// The path that produced it.
    pub source: RegionProvenance,
}

/// One audit record for an artist row, serialised as a single JSON line.
///
/// Artist rows always produce an entry, including an empty `imputed` map
/// when resolution failed outright: the log doubles as a record of which
/// rows the batch could not enrich.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistAuditEntry {
    /// Zero-based row index within the batch.
    pub row_index: usize,
    /// The row's display name.
    pub wiki_title: Option<String>,
    /// Columns actually written, with the applied values.
    pub imputed: ChangeSet,
    /// Region resolution provenance, when a region was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_info: Option<RegionInfo>,
}

/// One audit record for a track row, serialised as a single JSON line.
///
/// Track rows emit an entry only when at least one column was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackAuditEntry {
    /// Zero-based row index within the batch.
    pub row_index: usize,
    /// The row's identity cell, when the dataset has an id column.
    pub track_id: Option<Value>,
    /// The row's (cleaned) title.
    pub title: Option<String>,
    /// Columns actually written, with the applied values.
    pub updates: ChangeSet,
}
