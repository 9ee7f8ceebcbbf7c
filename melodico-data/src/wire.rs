//! Wire-format types for the remote APIs, with claim classification.
//!
//! Raw payloads are classified into tagged [`ClaimValue`]s exactly once,
//! here, so every later stage dispatches on the tag instead of re-probing
//! JSON shapes.

use std::collections::BTreeMap;

use geo::Coord;
use melodico_core::{ClaimValue, EntityId, EntityRecord, Recording, Release};
use serde::Deserialize;

/// Response of the encyclopedia page-props query used for identifier
/// lookup.
#[derive(Debug, Deserialize)]
pub(crate) struct PagePropsResponse {
    #[serde(default)]
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: BTreeMap<String, PropsPage>,
}

#[derive(Debug, Deserialize)]
struct PropsPage {
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    wikibase_item: Option<String>,
}

impl PagePropsResponse {
    /// The first page's knowledge-graph item, when the page exists and is
    /// linked.
    pub(crate) fn wikibase_item(&self) -> Option<EntityId> {
        let query = self.query.as_ref()?;
        let page = query.pages.values().next()?;
        let props = page.pageprops.as_ref()?;
        EntityId::parse(props.wikibase_item.as_deref()?)
    }
}

/// Response of the plain-text extract query.
#[derive(Debug, Deserialize)]
pub(crate) struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: BTreeMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

impl ExtractResponse {
    /// The first page's extract, or the empty string.
    pub(crate) fn into_text(self) -> String {
        self.query
            .and_then(|query| query.pages.into_values().next())
            .and_then(|page| page.extract)
            .unwrap_or_default()
    }
}

/// Envelope of the entity-data endpoint: `{"entities": {"Q42": {...}}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct EntityEnvelope {
    #[serde(default)]
    entities: BTreeMap<String, RawEntity>,
}

impl EntityEnvelope {
    /// The record for `id`, when the envelope contains it.
    pub(crate) fn into_record(mut self, id: &EntityId) -> Option<EntityRecord> {
        self.entities
            .remove(id.as_str())
            .and_then(RawEntity::into_record)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntity {
    id: String,
    #[serde(default)]
    labels: BTreeMap<String, RawText>,
    #[serde(default)]
    descriptions: BTreeMap<String, RawText>,
    #[serde(default)]
    claims: BTreeMap<String, Vec<RawClaim>>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    #[serde(rename = "mainsnak", default)]
    main_snak: Option<RawSnak>,
}

#[derive(Debug, Deserialize)]
struct RawSnak {
    #[serde(rename = "datavalue", default)]
    data_value: Option<RawDataValue>,
}

#[derive(Debug, Deserialize)]
struct RawDataValue {
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl RawEntity {
    fn into_record(self) -> Option<EntityRecord> {
        let id = EntityId::parse(&self.id)?;
        let labels = text_map(self.labels);
        let descriptions = text_map(self.descriptions);
        let claims = self
            .claims
            .into_iter()
            .map(|(property, raw_claims)| {
                let values: Vec<ClaimValue> = raw_claims
                    .into_iter()
                    .filter_map(|claim| {
                        claim
                            .main_snak
                            .and_then(|snak| snak.data_value)
                            .and_then(|data_value| data_value.value)
                            .map(|payload| classify_payload(&payload))
                    })
                    .collect();
                (property, values)
            })
            .collect();
        Some(EntityRecord::new(id, labels, descriptions, claims))
    }
}

fn text_map(raw: BTreeMap<String, RawText>) -> BTreeMap<String, String> {
    raw.into_iter()
        .map(|(language, text)| (language, text.value))
        .collect()
}

/// Classify one claim payload by shape, preserving the tag for later
/// normalisation.
pub(crate) fn classify_payload(payload: &serde_json::Value) -> ClaimValue {
    if let Some(object) = payload.as_object() {
        if let Some(id) = object.get("id").and_then(serde_json::Value::as_str) {
            if let Some(entity_id) = EntityId::parse(id) {
                return ClaimValue::EntityRef(entity_id);
            }
            return ClaimValue::Text(id.to_owned());
        }
        if let Some(time) = object.get("time").and_then(serde_json::Value::as_str) {
            return ClaimValue::Time(time.to_owned());
        }
        if let (Some(latitude), Some(longitude)) = (
            object.get("latitude").and_then(serde_json::Value::as_f64),
            object.get("longitude").and_then(serde_json::Value::as_f64),
        ) {
            return ClaimValue::Coordinates(Coord {
                x: longitude,
                y: latitude,
            });
        }
        if let Some(text) = object.get("text").and_then(serde_json::Value::as_str) {
            return ClaimValue::Monolingual(text.to_owned());
        }
        if let Some(url) = object.get("url").and_then(serde_json::Value::as_str) {
            return ClaimValue::Text(url.to_owned());
        }
        return ClaimValue::Other(payload.clone());
    }
    if let Some(pair) = coordinate_pair(payload) {
        return pair;
    }
    if let Some(text) = payload.as_str() {
        return ClaimValue::Text(text.to_owned());
    }
    if let Some(number) = payload.as_f64() {
        return ClaimValue::Number(number);
    }
    ClaimValue::Other(payload.clone())
}

fn coordinate_pair(payload: &serde_json::Value) -> Option<ClaimValue> {
    let array = payload.as_array()?;
    if let [latitude, longitude] = array.as_slice() {
        let latitude = latitude.as_f64()?;
        let longitude = longitude.as_f64()?;
        return Some(ClaimValue::Coordinates(Coord {
            x: longitude,
            y: latitude,
        }));
    }
    None
}

/// Response of the recording-search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<RawRecording>,
}

impl RecordingSearchResponse {
    /// The first search result, converted to the domain shape.
    pub(crate) fn into_first(self) -> Option<Recording> {
        self.recordings.into_iter().next().map(RawRecording::into_recording)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRecording {
    #[serde(default)]
    title: String,
    #[serde(default)]
    length: Option<u64>,
    #[serde(rename = "first-release-date", default)]
    first_release_date: Option<String>,
    #[serde(default)]
    releases: Vec<RawRelease>,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(rename = "text-representation", default)]
    text_representation: Option<RawTextRepresentation>,
}

#[derive(Debug, Deserialize)]
struct RawTextRepresentation {
    #[serde(default)]
    language: Option<String>,
}

impl RawRecording {
    fn into_recording(self) -> Recording {
        Recording {
            title: self.title,
            length_ms: self.length,
            first_release_date: self.first_release_date,
            releases: self
                .releases
                .into_iter()
                .map(|release| Release {
                    title: release.title,
                    date: release.date,
                    language: release
                        .text_representation
                        .and_then(|representation| representation.language),
                })
                .collect(),
        }
    }
}
