//! Row imputers: the per-row enrichment pipelines for artists and tracks.
//!
//! Each imputer owns its remote source, walks a dataset row by row, derives
//! candidate values, applies them under the shared conflict policy (write
//! iff overwrite is enabled or the cell is missing) and appends one JSON
//! line per row to its audit log. A batch always completes: resolution
//! failures short-circuit individual rows, and only configuration mistakes
//! (an unknown artist id, a registered column missing from the dataset)
//! abort the run.
//!
//! The two variants log differently on purpose: artist rows always produce
//! an audit entry, including an empty one when nothing could be resolved,
//! while track rows only log when at least one column was applied. The
//! artist log thereby doubles as a coverage report over the corpus.

#![forbid(unsafe_code)]

mod artist;
mod audit;
mod error;
pub mod test_support;
mod track;

pub use artist::{ArtistImputer, ArtistImputerConfig, LATITUDE_COLUMN, LONGITUDE_COLUMN};
pub use audit::AuditLog;
pub use error::ImputeError;
pub use track::{TrackField, TrackImputer, TrackImputerConfig, default_extractors};

/// Outcome of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImputeSummary {
    /// Rows the imputer visited.
    pub rows: usize,
    /// Rows where at least one column was applied.
    pub rows_changed: usize,
}
