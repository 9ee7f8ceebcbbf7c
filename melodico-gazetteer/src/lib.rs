//! Geographic vocabulary and region inference from free text.
//!
//! When no structured record supplies an administrative region, the engine
//! falls back to scanning a biography for mentions of known regions, their
//! synonyms, and known cities (counted against the city's region). The
//! candidate ranking and the confidence margin are deliberately
//! precision-over-recall: an ambiguous text must produce no guess rather
//! than a wrong one.
//!
//! The vocabulary is injected data. [`RegionVocabulary::italian`] ships the
//! table used by the artist corpus; tests supply small fixture tables.
//!
//! # Examples
//! ```
//! use melodico_gazetteer::{DEFAULT_MARGIN, RegionVocabulary, infer_region};
//!
//! let vocabulary = RegionVocabulary::italian();
//! let text = "Cresciuto a Milano, ha esordito nella scena milanese. \
//!             Milano resta il centro della sua attivita.";
//! let region = infer_region(text, &vocabulary, DEFAULT_MARGIN);
//! assert_eq!(region.as_deref(), Some("Lombardia"));
//! ```

#![forbid(unsafe_code)]

mod infer;
mod vocabulary;

pub use infer::{DEFAULT_MARGIN, RegionMention, infer_region, rank_mentions};
pub use vocabulary::{RegionVocabulary, strip_qualifier};
