//! The track row imputer.

use std::collections::BTreeMap;

use melodico_core::{
    ChangeSet, Dataset, Recording, RecordingSource, Row, TrackAuditEntry, Value, apply_derived,
};

use crate::audit::AuditLog;
use crate::error::ImputeError;
use crate::ImputeSummary;

/// One registered per-column extraction over a fetched recording.
///
/// The registry maps target columns to variants of this enum at
/// construction time, so the per-row loop never branches on column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackField {
    /// Title of the first release carrying the recording.
    Album,
    /// Release date, zero-padded to `YYYY-MM-DD` precision where available.
    ReleaseDate,
    /// Recording duration in milliseconds.
    Duration,
    /// Two-letter lowercase language code of the first release's text
    /// representation.
    Language,
}

impl TrackField {
    /// Extract this field from `recording`, when the catalogue knows it.
    #[must_use]
    pub fn extract(self, recording: &Recording) -> Option<Value> {
        match self {
            Self::Album => recording
                .first_release()
                .and_then(|release| release.title.clone())
                .map(Value::from),
            Self::ReleaseDate => recording
                .first_release_date
                .as_deref()
                .or_else(|| {
                    recording
                        .first_release()
                        .and_then(|release| release.date.as_deref())
                })
                .and_then(pad_date)
                .map(Value::from),
            Self::Duration => recording
                .length_ms
                .map(|length| Value::Number(length as f64)),
            Self::Language => recording
                .first_release()
                .and_then(|release| release.language.as_deref())
                .and_then(language_code)
                .map(Value::from),
        }
    }
}

/// The default registry: the four columns the track corpus is missing most.
#[must_use]
pub fn default_extractors() -> BTreeMap<String, TrackField> {
    BTreeMap::from([
        ("album".to_owned(), TrackField::Album),
        ("date".to_owned(), TrackField::ReleaseDate),
        ("duration".to_owned(), TrackField::Duration),
        ("language".to_owned(), TrackField::Language),
    ])
}

/// Configuration for [`TrackImputer`].
#[derive(Debug, Clone)]
pub struct TrackImputerConfig {
    /// Column holding the track title.
    pub title_column: String,
    /// Column holding the primary artist name.
    pub artist_column: String,
    /// Column consulted for the artist when the primary column is empty.
    pub artist_fallback_column: Option<String>,
    /// Column holding the track id, echoed into audit entries.
    pub id_column: Option<String>,
    /// Overwrite populated cells instead of filling only missing ones.
    pub overwrite_existing: bool,
    /// Target columns with their extraction strategies.
    pub extractors: BTreeMap<String, TrackField>,
}

impl Default for TrackImputerConfig {
    fn default() -> Self {
        Self {
            title_column: "title".to_owned(),
            artist_column: "primary_artist".to_owned(),
            artist_fallback_column: Some("name_artist".to_owned()),
            id_column: Some("id".to_owned()),
            overwrite_existing: false,
            extractors: default_extractors(),
        }
    }
}

impl TrackImputerConfig {
    /// Toggle overwriting of populated cells.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Replace the extractor registry.
    #[must_use]
    pub fn with_extractors(mut self, extractors: BTreeMap<String, TrackField>) -> Self {
        self.extractors = extractors;
        self
    }
}

/// Enriches track rows from the recording catalogue.
///
/// Rows already populated across every registered column never trigger a
/// network call; rows whose title cleans to the empty string are skipped
/// silently. An audit entry is appended only when at least one column was
/// applied.
pub struct TrackImputer<S: RecordingSource> {
    source: S,
    config: TrackImputerConfig,
    audit: Option<AuditLog>,
}

impl<S: RecordingSource> TrackImputer<S> {
    /// Construct an imputer over `source` with the given configuration.
    pub fn new(source: S, config: TrackImputerConfig) -> Self {
        Self {
            source,
            config,
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
    /// Returns [`ImputeError::MissingColumn`] when a registered column is
    /// absent from a row that otherwise needs imputation.
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
    /// Returns [`ImputeError::MissingColumn`] when a registered column is
    /// absent from the row.
    pub fn impute_row(
        &mut self,
        row_index: usize,
        row: &Row,
    ) -> Result<(Row, ChangeSet), ImputeError> {
        if !self.needs_imputation(row) {
            return Ok((row.clone(), ChangeSet::new()));
        }
        let Some(title) = row.get(&self.config.title_column).and_then(clean) else {
            return Ok((row.clone(), ChangeSet::new()));
        };
        let artist = row
            .get(&self.config.artist_column)
            .and_then(clean)
            .or_else(|| {
                self.config
                    .artist_fallback_column
                    .as_ref()
                    .and_then(|column| row.get(column))
                    .and_then(clean)
            });

        let Some(recording) = self.source.search_recording(&title, artist.as_deref()) else {
            return Ok((row.clone(), ChangeSet::new()));
        };

        let mut derived = BTreeMap::new();
        for (column, field) in &self.config.extractors {
            let existing = row.get(column).ok_or_else(|| ImputeError::MissingColumn {
                row_index,
                column: column.clone(),
            })?;
            if self.config.overwrite_existing || existing.is_missing() {
                if let Some(value) = field.extract(&recording) {
                    if !value.is_missing() {
                        derived.insert(column.clone(), value);
                    }
                }
            }
        }

        let (updated, applied) = apply_derived(row, &derived, self.config.overwrite_existing);
        if !applied.is_empty() {
            self.log_entry(TrackAuditEntry {
                row_index,
                track_id: self
                    .config
                    .id_column
                    .as_ref()
                    .and_then(|column| row.get(column))
                    .cloned(),
                title: Some(title),
                updates: applied.clone(),
            });
        }
        Ok((updated, applied))
    }

    /// Whether any registered column present in the row is missing a value.
    fn needs_imputation(&self, row: &Row) -> bool {
        self.config
            .extractors
            .keys()
            .filter(|column| row.contains(column))
            .any(|column| row.is_missing(column))
    }

    fn log_entry(&self, entry: TrackAuditEntry) {
        if let Some(audit) = &self.audit {
            audit.append(&entry);
        }
    }
}

/// Collapse internal whitespace and trim; `None` when nothing remains.
fn clean(value: &Value) -> Option<String> {
    let text = value.as_text()?;
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Zero-pad a partial catalogue date to `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn pad_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split('-').collect();
    match parts.as_slice() {
        [year] => Some((*year).to_owned()),
        [year, month] => Some(format!("{year}-{month:0>2}")),
        [year, month, day, ..] => Some(format!("{year}-{month:0>2}-{day:0>2}")),
        [] => None,
    }
}

/// Lowercase two-letter language code, from a possibly longer catalogue code.
fn language_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase().chars().take(2).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use melodico_core::Release;
    use rstest::rstest;

    #[rstest]
    #[case("2016-9-9", Some("2016-09-09"))]
    #[case("2016-12-01", Some("2016-12-01"))]
    #[case("2016-9", Some("2016-09"))]
    #[case("2016", Some("2016"))]
    #[case("   ", None)]
    fn pads_partial_dates(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(pad_date(raw).as_deref(), expected);
    }

    #[rstest]
    #[case("ita", Some("it"))]
    #[case("ENG", Some("en"))]
    #[case("fr", Some("fr"))]
    #[case("", None)]
    fn shortens_language_codes(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(language_code(raw).as_deref(), expected);
    }

    #[rstest]
    fn cleaning_collapses_whitespace() {
        assert_eq!(
            clean(&Value::from("  Song   of\tthe  Year ")).as_deref(),
            Some("Song of the Year")
        );
        assert!(clean(&Value::from("   ")).is_none());
        assert!(clean(&Value::Null).is_none());
    }

    #[rstest]
    fn extractors_read_the_first_release() {
        let recording = Recording {
            title: "Song X".to_owned(),
            length_ms: Some(215_000),
            first_release_date: Some("2016-9-9".to_owned()),
            releases: vec![Release {
                title: Some("Album Y".to_owned()),
                date: Some("2016-9-9".to_owned()),
                language: Some("ita".to_owned()),
            }],
        };
        assert_eq!(
            TrackField::Album.extract(&recording),
            Some(Value::from("Album Y"))
        );
        assert_eq!(
            TrackField::ReleaseDate.extract(&recording),
            Some(Value::from("2016-09-09"))
        );
        assert_eq!(
            TrackField::Duration.extract(&recording),
            Some(Value::Number(215_000.0))
        );
        assert_eq!(
            TrackField::Language.extract(&recording),
            Some(Value::from("it"))
        );
    }

    #[rstest]
    fn extractors_tolerate_sparse_recordings() {
        let recording = Recording::default();
        assert!(TrackField::Album.extract(&recording).is_none());
        assert!(TrackField::ReleaseDate.extract(&recording).is_none());
        assert!(TrackField::Duration.extract(&recording).is_none());
        assert!(TrackField::Language.extract(&recording).is_none());
    }
}
