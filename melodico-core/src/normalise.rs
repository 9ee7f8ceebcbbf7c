//! Conversion of tagged claim values into target-schema cells.
//!
//! Each property family has one rule; the property-to-rule mapping is fixed
//! at table construction so no per-call string switching happens on the hot
//! path.

use std::collections::BTreeMap;

use crate::claim::{ClaimValue, EntityId};
use crate::entity::LanguagePriority;
use crate::source::LabelResolver;
use crate::value::Value;

/// How a property's claim values become cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormaliseRule {
    /// Strip the leading sign and truncate to the date portion.
    Date,
    /// Resolve to a label, then map through the gender vocabulary.
    Gender,
    /// Decompose into separate latitude and longitude cells.
    Coordinates,
    /// Resolve identifier-shaped values to display labels.
    Label,
    /// Pass the value through unchanged.
    Verbatim,
}

/// Target column and rule for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    /// Column the property feeds.
    pub column: String,
    /// Normalisation applied on the way in.
    pub rule: NormaliseRule,
}

impl PropertySpec {
    /// Construct a spec for `column` with `rule`.
    pub fn new(column: impl Into<String>, rule: NormaliseRule) -> Self {
        Self {
            column: column.into(),
            rule,
        }
    }
}

/// The property-to-column mapping, resolved once at construction.
///
/// # Examples
/// ```
/// use melodico_core::{NormaliseRule, PropertySpec, PropertyTable};
///
/// let table = PropertyTable::new([
///     ("P569".to_owned(), PropertySpec::new("birth_date", NormaliseRule::Date)),
/// ]);
/// assert_eq!(table.get("P569").map(|spec| spec.rule), Some(NormaliseRule::Date));
/// assert!(table.get("P21").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    entries: BTreeMap<String, PropertySpec>,
}

impl PropertyTable {
    /// Build a table from `(property id, spec)` pairs.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PropertySpec)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The default artist mapping: direct person/group properties onto the
    /// artist dataset's columns.
    #[must_use]
    pub fn artist_defaults() -> Self {
        Self::new([
            (
                "P21".to_owned(),
                PropertySpec::new("gender", NormaliseRule::Gender),
            ),
            (
                "P569".to_owned(),
                PropertySpec::new("birth_date", NormaliseRule::Date),
            ),
            (
                "P19".to_owned(),
                PropertySpec::new("birth_place", NormaliseRule::Label),
            ),
            (
                "P27".to_owned(),
                PropertySpec::new("nationality", NormaliseRule::Label),
            ),
            (
                "P2031".to_owned(),
                PropertySpec::new("active_start", NormaliseRule::Date),
            ),
            (
                "P2032".to_owned(),
                PropertySpec::new("active_end", NormaliseRule::Date),
            ),
            (
                "P131".to_owned(),
                PropertySpec::new("province_or_region", NormaliseRule::Label),
            ),
            (
                "P17".to_owned(),
                PropertySpec::new("country", NormaliseRule::Label),
            ),
            (
                "P625".to_owned(),
                PropertySpec::new("coordinates", NormaliseRule::Coordinates),
            ),
        ])
    }

    /// Look up the spec for `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&PropertySpec> {
        self.entries.get(property)
    }

    /// Iterate over `(property id, spec)` pairs in property order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertySpec)> {
        self.entries
            .iter()
            .map(|(property, spec)| (property.as_str(), spec))
    }
}

/// Truncate a knowledge-graph timestamp to its date portion.
///
/// A single leading sign character is stripped and everything from the
/// first `T` onwards is discarded. Inputs without either are returned
/// trimmed but otherwise unchanged.
///
/// # Examples
/// ```
/// use melodico_core::normalise_date;
///
/// assert_eq!(normalise_date("+1992-12-07T00:00:00Z"), "1992-12-07");
/// assert_eq!(normalise_date("1980"), "1980");
/// ```
#[must_use]
pub fn normalise_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    match unsigned.split_once('T') {
        Some((date, _)) => date.to_owned(),
        None => unsigned.to_owned(),
    }
}

/// Map a gender label to its single-letter code.
///
/// The vocabulary covers the English and Italian male/female forms;
/// comparison ignores case and surrounding whitespace. Unrecognised labels
/// yield `None` so callers can pass the raw label through instead.
#[must_use]
pub fn gender_code(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().as_str() {
        "male" | "maschio" | "uomo" => Some("M"),
        "female" | "femmina" | "donna" => Some("F"),
        _ => None,
    }
}

/// Split a coordinate claim into `(latitude, longitude)`.
#[must_use]
pub fn coordinate_parts(value: &ClaimValue) -> Option<(f64, f64)> {
    match value {
        ClaimValue::Coordinates(coord) => Some((coord.y, coord.x)),
        _ => None,
    }
}

/// Normalise one claim value under `rule` into a cell.
///
/// Returns `None` when the value cannot be represented under the rule
/// (an unresolvable reference, a coordinate pair fed to a scalar column);
/// callers skip such values rather than writing placeholders. Coordinate
/// claims are handled by [`coordinate_parts`] because they feed two columns.
pub fn normalise_claim(
    rule: NormaliseRule,
    value: &ClaimValue,
    languages: &LanguagePriority,
    resolver: &mut dyn LabelResolver,
) -> Option<Value> {
    match rule {
        NormaliseRule::Date => match value {
            ClaimValue::Time(raw) | ClaimValue::Text(raw) => {
                Some(Value::Text(normalise_date(raw)))
            }
            other => verbatim_cell(other),
        },
        NormaliseRule::Gender => {
            let id = reference_id(value)?;
            let label = resolver.resolve_label(&id, languages)?;
            Some(Value::Text(
                gender_code(&label).map_or(label, str::to_owned),
            ))
        }
        NormaliseRule::Coordinates => None,
        NormaliseRule::Label => match reference_id(value) {
            Some(id) => resolver.resolve_label(&id, languages).map(Value::Text),
            None => verbatim_cell(value),
        },
        NormaliseRule::Verbatim => verbatim_cell(value),
    }
}

fn reference_id(value: &ClaimValue) -> Option<EntityId> {
    match value {
        ClaimValue::EntityRef(id) => Some(id.clone()),
        ClaimValue::Text(text) => EntityId::parse(text),
        _ => None,
    }
}

fn verbatim_cell(value: &ClaimValue) -> Option<Value> {
    match value {
        ClaimValue::EntityRef(id) => Some(Value::Text(id.as_str().to_owned())),
        ClaimValue::Time(raw) => Some(Value::Text(raw.clone())),
        ClaimValue::Monolingual(text) | ClaimValue::Text(text) => {
            Some(Value::Text(text.clone()))
        }
        ClaimValue::Number(number) => Some(Value::Number(*number)),
        ClaimValue::Coordinates(_) => None,
        ClaimValue::Other(raw) => Some(Value::Text(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;
    use std::collections::BTreeMap;

    struct FixedLabels {
        labels: BTreeMap<String, String>,
        calls: usize,
    }

    impl FixedLabels {
        fn new<const N: usize>(pairs: [(&str, &str); N]) -> Self {
            Self {
                labels: pairs
                    .into_iter()
                    .map(|(id, label)| (id.to_owned(), label.to_owned()))
                    .collect(),
                calls: 0,
            }
        }
    }

    impl LabelResolver for FixedLabels {
        fn resolve_label(
            &mut self,
            id: &EntityId,
            _languages: &LanguagePriority,
        ) -> Option<String> {
            self.calls += 1;
            self.labels.get(id.as_str()).cloned()
        }
    }

    #[rstest]
    #[case("+1992-12-07T00:00:00Z", "1992-12-07")]
    #[case("-0044-03-15T00:00:00Z", "0044-03-15")]
    #[case("+2001-01-01", "2001-01-01")]
    #[case("1980", "1980")]
    fn truncates_timestamps(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalise_date(raw), expected);
    }

    #[rstest]
    #[case("male", Some("M"))]
    #[case(" Maschio ", Some("M"))]
    #[case("FEMALE", Some("F"))]
    #[case("donna", Some("F"))]
    #[case("non-binary", None)]
    fn maps_gender_vocabulary(#[case] label: &str, #[case] expected: Option<&str>) {
        assert_eq!(gender_code(label), expected);
    }

    #[rstest]
    fn gender_rule_resolves_then_maps() {
        let mut resolver = FixedLabels::new([("Q6581097", "maschio")]);
        let value = ClaimValue::EntityRef(EntityId::parse("Q6581097").expect("id"));
        let cell = normalise_claim(
            NormaliseRule::Gender,
            &value,
            &LanguagePriority::default(),
            &mut resolver,
        );
        assert_eq!(cell, Some(Value::from("M")));
    }

    #[rstest]
    fn gender_rule_passes_unmapped_labels_through() {
        let mut resolver = FixedLabels::new([("Q48270", "non binario")]);
        let value = ClaimValue::EntityRef(EntityId::parse("Q48270").expect("id"));
        let cell = normalise_claim(
            NormaliseRule::Gender,
            &value,
            &LanguagePriority::default(),
            &mut resolver,
        );
        assert_eq!(cell, Some(Value::from("non binario")));
    }

    #[rstest]
    fn label_rule_resolves_references() {
        let mut resolver = FixedLabels::new([("Q220", "Roma")]);
        let value = ClaimValue::EntityRef(EntityId::parse("Q220").expect("id"));
        let cell = normalise_claim(
            NormaliseRule::Label,
            &value,
            &LanguagePriority::default(),
            &mut resolver,
        );
        assert_eq!(cell, Some(Value::from("Roma")));
    }

    #[rstest]
    fn label_rule_keeps_plain_text() {
        let mut resolver = FixedLabels::new([]);
        let cell = normalise_claim(
            NormaliseRule::Label,
            &ClaimValue::Text("Trastevere".to_owned()),
            &LanguagePriority::default(),
            &mut resolver,
        );
        assert_eq!(cell, Some(Value::from("Trastevere")));
        assert_eq!(resolver.calls, 0);
    }

    #[rstest]
    fn unresolvable_reference_yields_none() {
        let mut resolver = FixedLabels::new([]);
        let value = ClaimValue::EntityRef(EntityId::parse("Q99999").expect("id"));
        let cell = normalise_claim(
            NormaliseRule::Label,
            &value,
            &LanguagePriority::default(),
            &mut resolver,
        );
        assert!(cell.is_none());
    }

    #[rstest]
    fn splits_coordinates_latitude_first() {
        let value = ClaimValue::Coordinates(Coord { x: 9.19, y: 45.46 });
        assert_eq!(coordinate_parts(&value), Some((45.46, 9.19)));
        assert!(coordinate_parts(&ClaimValue::Text("45,9".to_owned())).is_none());
    }

    #[rstest]
    fn artist_defaults_cover_the_enrichable_columns() {
        let table = PropertyTable::artist_defaults();
        assert_eq!(
            table.get("P569").map(|spec| spec.column.as_str()),
            Some("birth_date")
        );
        assert_eq!(
            table.get("P625").map(|spec| spec.rule),
            Some(NormaliseRule::Coordinates)
        );
        assert_eq!(
            table.get("P131").map(|spec| spec.column.as_str()),
            Some("province_or_region")
        );
    }
}
