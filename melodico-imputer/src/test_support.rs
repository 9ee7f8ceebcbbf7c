//! Deterministic test doubles for the source traits.
//!
//! The scripted sources return pre-configured records without any network
//! access and count every call, so tests can assert both outcomes and the
//! absence of outbound requests.

use std::collections::BTreeMap;

use melodico_core::{
    EntityId, EntityRecord, EntitySource, LabelResolver, LanguagePriority, Recording,
    RecordingSource,
};

/// Scripted [`EntitySource`] with per-method call counters.
///
/// # Examples
/// ```
/// use melodico_core::{EntityId, EntitySource};
/// use melodico_imputer::test_support::ScriptedEntitySource;
///
/// let mut source = ScriptedEntitySource::new()
///     .with_identifier("Example Artist", "Q100");
/// let id = source.resolve_identifier("Example Artist");
/// assert_eq!(id, EntityId::parse("Q100"));
/// assert_eq!(source.identifier_calls(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntitySource {
    identifiers: BTreeMap<String, EntityId>,
    entities: BTreeMap<EntityId, EntityRecord>,
    labels: BTreeMap<EntityId, String>,
    texts: BTreeMap<(String, String), String>,
    identifier_calls: usize,
    entity_calls: usize,
    label_calls: usize,
    text_calls: usize,
}

impl ScriptedEntitySource {
    /// An empty source: every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an identifier lookup. Invalid ids are ignored.
    #[must_use]
    pub fn with_identifier(mut self, title: &str, id: &str) -> Self {
        if let Some(id) = EntityId::parse(id) {
            self.identifiers.insert(title.to_owned(), id);
        }
        self
    }

    /// Script a full record, keyed by its own identifier.
    #[must_use]
    pub fn with_entity(mut self, record: EntityRecord) -> Self {
        self.entities.insert(record.id().clone(), record);
        self
    }

    /// Script a label lookup. Invalid ids are ignored.
    #[must_use]
    pub fn with_label(mut self, id: &str, label: &str) -> Self {
        if let Some(id) = EntityId::parse(id) {
            self.labels.insert(id, label.to_owned());
        }
        self
    }

    /// Script a text extract for `(language, title)`.
    #[must_use]
    pub fn with_text(mut self, language: &str, title: &str, text: &str) -> Self {
        self.texts
            .insert((language.to_owned(), title.to_owned()), text.to_owned());
        self
    }

    /// Number of identifier lookups performed.
    #[must_use]
    pub fn identifier_calls(&self) -> usize {
        self.identifier_calls
    }

    /// Number of entity fetches performed.
    #[must_use]
    pub fn entity_calls(&self) -> usize {
        self.entity_calls
    }

    /// Number of label resolutions performed.
    #[must_use]
    pub fn label_calls(&self) -> usize {
        self.label_calls
    }

    /// Number of text fetches performed.
    #[must_use]
    pub fn text_calls(&self) -> usize {
        self.text_calls
    }
}

impl LabelResolver for ScriptedEntitySource {
    fn resolve_label(&mut self, id: &EntityId, _languages: &LanguagePriority) -> Option<String> {
        self.label_calls += 1;
        self.labels.get(id).cloned()
    }
}

impl EntitySource for ScriptedEntitySource {
    fn resolve_identifier(&mut self, title: &str) -> Option<EntityId> {
        self.identifier_calls += 1;
        self.identifiers.get(title.trim()).cloned()
    }

    fn fetch_entity(&mut self, id: &EntityId) -> Option<EntityRecord> {
        self.entity_calls += 1;
        self.entities.get(id).cloned()
    }

    fn fetch_text(&mut self, title: &str, language: &str) -> String {
        self.text_calls += 1;
        self.texts
            .get(&(language.to_owned(), title.trim().to_owned()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Scripted [`RecordingSource`] keyed by cleaned title, with a call counter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecordingSource {
    recordings: BTreeMap<String, Recording>,
    calls: usize,
}

impl ScriptedRecordingSource {
    /// An empty source: every search misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a search hit for `title`.
    #[must_use]
    pub fn with_recording(mut self, title: &str, recording: Recording) -> Self {
        self.recordings.insert(title.to_owned(), recording);
        self
    }

    /// Number of searches performed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl RecordingSource for ScriptedRecordingSource {
    fn search_recording(&mut self, title: &str, _artist: Option<&str>) -> Option<Recording> {
        self.calls += 1;
        self.recordings.get(title).cloned()
    }
}
