//! The artist row imputer.

use std::collections::BTreeMap;

use melodico_core::{
    ArtistAuditEntry, ChangeSet, ClaimValue, Dataset, EntityId, EntityRecord, EntitySource,
    LanguagePriority, NormaliseRule, PropertyTable, RegionInfo, RegionProvenance, Row, Value,
    apply_derived, coordinate_parts, normalise_claim,
};
use melodico_gazetteer::{DEFAULT_MARGIN, RegionVocabulary, infer_region, strip_qualifier};

use crate::audit::AuditLog;
use crate::error::ImputeError;
use crate::ImputeSummary;

/// Column receiving the latitude half of a coordinate claim.
pub const LATITUDE_COLUMN: &str = "latitude";
/// Column receiving the longitude half of a coordinate claim.
pub const LONGITUDE_COLUMN: &str = "longitude";

const DEFAULT_HINT_PROPERTIES: [&str; 6] = [
    "P937", // work location
    "P551", // residence
    "P740", // location of formation
    "P69",  // educated at
    "P108", // employer
    "P463", // member of
];

/// Configuration for [`ArtistImputer`].
#[derive(Debug, Clone)]
pub struct ArtistImputerConfig {
    /// Column holding the row's identity id.
    pub id_column: String,
    /// Column holding the display name, used in audit entries.
    pub name_column: String,
    /// Extra column that receives the resolved region alongside the
    /// structured one, when configured.
    pub region_column: Option<String>,
    /// Column receiving the entity description, when configured.
    pub description_column: Option<String>,
    /// The property-to-column mapping with normalisation rules.
    pub properties: PropertyTable,
    /// Properties scanned, in order, for regional hints when the record has
    /// no structured region.
    pub hint_properties: Vec<String>,
    /// Identity id to encyclopedia page title. An id absent from this table
    /// aborts the batch; an id mapped to the empty string marks a row known
    /// to have no usable page.
    pub title_mapping: BTreeMap<String, String>,
    /// Overwrite populated cells instead of filling only missing ones.
    pub overwrite_existing: bool,
    /// Label and description language preference.
    pub languages: LanguagePriority,
    /// Language of the biography text used by the fallback heuristic.
    pub text_language: String,
    /// Margin for the text heuristic's confidence rule.
    pub region_margin: usize,
}

impl Default for ArtistImputerConfig {
    fn default() -> Self {
        Self {
            id_column: "id_author".to_owned(),
            name_column: "name".to_owned(),
            region_column: Some("region".to_owned()),
            description_column: Some("description".to_owned()),
            properties: PropertyTable::artist_defaults(),
            hint_properties: DEFAULT_HINT_PROPERTIES
                .into_iter()
                .map(str::to_owned)
                .collect(),
            title_mapping: BTreeMap::new(),
            overwrite_existing: false,
            languages: LanguagePriority::default(),
            text_language: "it".to_owned(),
            region_margin: DEFAULT_MARGIN,
        }
    }
}

impl ArtistImputerConfig {
    /// Supply the identity-to-title table.
    #[must_use]
    pub fn with_title_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.title_mapping = mapping;
        self
    }

    /// Toggle overwriting of populated cells.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Replace the property table.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertyTable) -> Self {
        self.properties = properties;
        self
    }
}

/// Enriches artist rows from the knowledge graph, with a layered region
/// fallback.
///
/// Per row: the identity id is mapped to a page title through configuration,
/// the entity is resolved and fetched (cached), each mapped property is
/// extracted and normalised, the region is resolved through up to three
/// strategies, values are applied under the conflict policy and one audit
/// entry is appended — also for rows where nothing could be resolved.
pub struct ArtistImputer<S: EntitySource> {
    source: S,
    vocabulary: RegionVocabulary,
    config: ArtistImputerConfig,
    region_source_column: String,
    hint_regions: BTreeMap<EntityId, Option<String>>,
    audit: Option<AuditLog>,
}

impl<S: EntitySource> ArtistImputer<S> {
    /// Construct an imputer over `source` with the given vocabulary and
    /// configuration.
    pub fn new(source: S, vocabulary: RegionVocabulary, config: ArtistImputerConfig) -> Self {
        let region_source_column = config
            .properties
            .get("P131")
            .map_or_else(|| "province_or_region".to_owned(), |spec| spec.column.clone());
        Self {
            source,
            vocabulary,
            config,
            region_source_column,
            hint_regions: BTreeMap::new(),
            audit: None,
        }
    }

    /// Attach an audit log.
    #[must_use]
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Borrow the underlying source (used by tests to inspect call counts).
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Enrich every row of `dataset` in place.
    ///
    /// # Errors
    /// Returns [`ImputeError`] for configuration mistakes: an identity id
    /// absent from the title mapping, or a missing identity column.
    pub fn impute(&mut self, dataset: &mut Dataset) -> Result<ImputeSummary, ImputeError> {
        let mut summary = ImputeSummary::default();
        for index in 0..dataset.len() {
            let Some(row) = dataset.rows().get(index).cloned() else {
                break;
            };
            let (updated, applied) = self.impute_row(index, &row)?;
            if !applied.is_empty() {
                summary.rows_changed += 1;
            }
            dataset.replace_row(index, updated);
            summary.rows += 1;
        }
        Ok(summary)
    }

    /// Enrich a single row, returning the updated row and the applied
    /// change-set.
    ///
    /// # Errors
    /// Returns [`ImputeError`] when the identity cell is absent or unknown
    /// to the title mapping.
    pub fn impute_row(
        &mut self,
        row_index: usize,
        row: &Row,
    ) -> Result<(Row, ChangeSet), ImputeError> {
        let id = row
            .get(&self.config.id_column)
            .ok_or_else(|| ImputeError::MissingColumn {
                row_index,
                column: self.config.id_column.clone(),
            })?
            .to_string();
        let title = self
            .config
            .title_mapping
            .get(&id)
            .ok_or_else(|| ImputeError::UnknownArtistId { row_index, id })?
            .clone();

        let display_name = row
            .get(&self.config.name_column)
            .filter(|value| !value.is_missing())
            .map(Value::to_string);

        let Some(entity) = self.entity_from_title(&title) else {
            self.log_entry(ArtistAuditEntry {
                row_index,
                wiki_title: display_name,
                imputed: ChangeSet::new(),
                region_info: None,
            });
            return Ok((row.clone(), ChangeSet::new()));
        };

        let mut derived = self.extract_record(&entity);

        let current_region = derived
            .get(&self.region_source_column)
            .filter(|value| !value.is_missing())
            .cloned()
            .or_else(|| {
                row.get(&self.region_source_column)
                    .filter(|value| !value.is_missing())
                    .cloned()
            });
        let region_info = self.resolve_region(&entity, &title, current_region);
        if let Some(info) = &region_info {
            derived.insert(
                self.region_source_column.clone(),
                Value::from(info.value.clone()),
            );
            if let Some(region_column) = &self.config.region_column {
                derived
                    .entry(region_column.clone())
                    .or_insert_with(|| Value::from(info.value.clone()));
            }
        }

        let (updated, applied) = apply_derived(row, &derived, self.config.overwrite_existing);
        self.log_entry(ArtistAuditEntry {
            row_index,
            wiki_title: display_name,
            imputed: applied.clone(),
            region_info,
        });
        Ok((updated, applied))
    }

    fn entity_from_title(&mut self, title: &str) -> Option<EntityRecord> {
        if title.trim().is_empty() {
            return None;
        }
        let id = self.source.resolve_identifier(title)?;
        self.source.fetch_entity(&id)
    }

    fn extract_record(&mut self, entity: &EntityRecord) -> BTreeMap<String, Value> {
        let mut derived = BTreeMap::new();
        for (property, spec) in self.config.properties.iter() {
            let Some(first) = entity.claim_values(property).first() else {
                continue;
            };
            if spec.rule == NormaliseRule::Coordinates {
                if let Some((latitude, longitude)) = coordinate_parts(first) {
                    derived.insert(LATITUDE_COLUMN.to_owned(), Value::Number(latitude));
                    derived.insert(LONGITUDE_COLUMN.to_owned(), Value::Number(longitude));
                }
                continue;
            }
            if let Some(value) =
                normalise_claim(spec.rule, first, &self.config.languages, &mut self.source)
            {
                derived.insert(spec.column.clone(), value);
            }
        }
        if let Some(description_column) = &self.config.description_column {
            if let Some(description) = entity.description(&self.config.languages) {
                derived
                    .entry(description_column.clone())
                    .or_insert_with(|| Value::from(description.to_owned()));
            }
        }
        derived
    }

    fn resolve_region(
        &mut self,
        entity: &EntityRecord,
        title: &str,
        current: Option<Value>,
    ) -> Option<RegionInfo> {
        if let Some(value) = current {
            return Some(RegionInfo {
                value: value.to_string(),
                source: RegionProvenance::WikidataProperty,
            });
        }
        if let Some(region) = self.region_from_hints(entity) {
            return Some(RegionInfo {
                value: region,
                source: RegionProvenance::RegionalHint,
            });
        }
        if let Some(region) = self.region_from_text(title) {
            return Some(RegionInfo {
                value: region,
                source: RegionProvenance::WikipediaText,
            });
        }
        None
    }

    fn region_from_hints(&mut self, entity: &EntityRecord) -> Option<String> {
        let hint_properties = self.config.hint_properties.clone();
        for property in &hint_properties {
            for value in entity.claim_values(property) {
                if let Some(region) = self.place_from_hint(value) {
                    return Some(region);
                }
            }
        }
        None
    }

    fn place_from_hint(&mut self, value: &ClaimValue) -> Option<String> {
        match value {
            ClaimValue::EntityRef(id) => {
                if let Some(cached) = self.hint_regions.get(id) {
                    return cached.clone();
                }
                let place = self
                    .source
                    .resolve_label(id, &self.config.languages)
                    .and_then(|label| self.canonical_place(&label));
                self.hint_regions.insert(id.clone(), place.clone());
                place
            }
            ClaimValue::Text(text) | ClaimValue::Monolingual(text) => self.canonical_place(text),
            _ => None,
        }
    }

    fn canonical_place(&self, label: &str) -> Option<String> {
        self.vocabulary
            .canonical_place(label)
            .or_else(|| self.vocabulary.canonical_place(strip_qualifier(label)))
    }

    fn region_from_text(&mut self, title: &str) -> Option<String> {
        let text = self
            .source
            .fetch_text(title, &self.config.text_language);
        if text.is_empty() {
            return None;
        }
        infer_region(&text, &self.vocabulary, self.config.region_margin)
    }

    fn log_entry(&self, entry: ArtistAuditEntry) {
        if let Some(audit) = &self.audit {
            audit.append(&entry);
        }
    }
}
