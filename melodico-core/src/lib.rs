//! Domain model for the melodico enrichment engine.
//!
//! The crate defines the tabular value model (cells, rows, datasets and the
//! missing-value predicate), the external knowledge model (entity records
//! with tagged claim values, recordings), the property-to-column mapping
//! with its per-property normalisation rules, the audit entry shapes, and
//! the traits remote clients implement. Everything here is synchronous and
//! side-effect free; network and filesystem concerns live in the
//! `melodico-data` and `melodico-imputer` crates.

#![forbid(unsafe_code)]

mod audit;
mod claim;
mod entity;
mod normalise;
mod recording;
mod row;
mod source;
mod value;

pub use audit::{ArtistAuditEntry, RegionInfo, RegionProvenance, TrackAuditEntry};
pub use claim::{ClaimValue, EntityId};
pub use entity::{EntityRecord, LanguagePriority};
pub use normalise::{
    NormaliseRule, PropertySpec, PropertyTable, coordinate_parts, gender_code, normalise_claim,
    normalise_date,
};
pub use recording::{Recording, Release};
pub use row::{ChangeSet, Dataset, Row, apply_derived};
pub use source::{EntitySource, LabelResolver, RecordingSource};
pub use value::Value;
