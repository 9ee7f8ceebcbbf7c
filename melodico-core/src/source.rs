use crate::claim::EntityId;
use crate::entity::{EntityRecord, LanguagePriority};
use crate::recording::Recording;

/// Resolve an entity identifier to a human-readable display label.
///
/// Implementations cache by identifier; repeated lookups for the same id
/// must not touch the network twice. Absence (unknown id, transport
/// failure) is an ordinary outcome, never an error.
pub trait LabelResolver {
    /// The label for `id` in the first available language of `languages`,
    /// falling back to any language, else `None`.
    fn resolve_label(&mut self, id: &EntityId, languages: &LanguagePriority) -> Option<String>;
}

/// A source of structured entity data and plain-text summaries.
///
/// All methods take `&mut self`: the engine is single-threaded and
/// sequential, and implementations mutate their own caches on every call.
/// Transport and decoding failures are recovered inside the implementation
/// and surfaced as the absence sentinel of each method — callers treat
/// `None` and the empty string as normal outcomes.
pub trait EntitySource: LabelResolver {
    /// Look up the stable identifier for an encyclopedia page title.
    fn resolve_identifier(&mut self, title: &str) -> Option<EntityId>;

    /// Fetch the full record for `id`. A cache hit short-circuits network
    /// access entirely.
    fn fetch_entity(&mut self, id: &EntityId) -> Option<EntityRecord>;

    /// Fetch the plain-text summary for `title` in `language`; the empty
    /// string on any failure.
    fn fetch_text(&mut self, title: &str, language: &str) -> String;
}

/// A source of recording metadata keyed by title and artist.
pub trait RecordingSource {
    /// Search the catalogue and return the first matching recording, if any.
    fn search_recording(&mut self, title: &str, artist: Option<&str>) -> Option<Recording>;
}
