use std::collections::BTreeMap;

use crate::claim::{ClaimValue, EntityId};

/// Language preference used when reading labels and descriptions.
///
/// The first available language in `(primary, fallback)` order wins; when
/// neither is present any available language is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePriority {
    primary: String,
    fallback: String,
}

impl LanguagePriority {
    /// Construct a priority from a primary and a fallback language code.
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    /// The preferred language code.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Language codes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.primary.as_str(), self.fallback.as_str()].into_iter()
    }
}

impl Default for LanguagePriority {
    fn default() -> Self {
        Self::new("it", "en")
    }
}

/// A structured description of a person or group fetched from the knowledge
/// graph, immutable once constructed.
///
/// Claims keep their source order and their wire-level tagging (see
/// [`ClaimValue`]); labels and descriptions are keyed by language code.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    id: EntityId,
    labels: BTreeMap<String, String>,
    descriptions: BTreeMap<String, String>,
    claims: BTreeMap<String, Vec<ClaimValue>>,
}

impl EntityRecord {
    /// Assemble a record from its parts.
    #[must_use]
    pub fn new(
        id: EntityId,
        labels: BTreeMap<String, String>,
        descriptions: BTreeMap<String, String>,
        claims: BTreeMap<String, Vec<ClaimValue>>,
    ) -> Self {
        Self {
            id,
            labels,
            descriptions,
            claims,
        }
    }

    /// The record's identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Every extracted value attached to `property`, in source order.
    ///
    /// Callers typically consult only the first element, but the full list
    /// is part of the contract: multi-valued properties (residences, member
    /// groups) are scanned in order by the hint resolution.
    #[must_use]
    pub fn claim_values(&self, property: &str) -> &[ClaimValue] {
        self.claims
            .get(property)
            .map_or(&[], Vec::as_slice)
    }

    /// The display label for `languages`, falling back to any available
    /// language, else `None`.
    #[must_use]
    pub fn label(&self, languages: &LanguagePriority) -> Option<&str> {
        for language in languages.iter() {
            if let Some(label) = self.labels.get(language) {
                return Some(label);
            }
        }
        self.labels.values().next().map(String::as_str)
    }

    /// The description for `languages`, with the same fallback behaviour as
    /// [`EntityRecord::label`].
    #[must_use]
    pub fn description(&self, languages: &LanguagePriority) -> Option<&str> {
        for language in languages.iter() {
            if let Some(description) = self.descriptions.get(language) {
                return Some(description);
            }
        }
        self.descriptions.values().next().map(String::as_str)
    }
}
