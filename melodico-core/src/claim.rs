use std::{fmt, ops::Deref};

use geo::Coord;

/// A stable knowledge-graph identifier: `Q` followed by digits for items,
/// `P` followed by digits for properties.
///
/// # Examples
/// ```
/// use melodico_core::EntityId;
///
/// let id = EntityId::parse("Q3815").expect("well-formed identifier");
/// assert_eq!(id.as_str(), "Q3815");
/// assert!(!id.is_property());
/// assert!(EntityId::parse("Queen").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// Parse a raw identifier, tolerating surrounding whitespace and a
    /// lowercase prefix. Returns `None` for anything that does not match the
    /// `Q`/`P` + digits shape.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let prefix = match chars.next()? {
            'Q' | 'q' => 'Q',
            'P' | 'p' => 'P',
            _ => return None,
        };
        let digits: String = chars.collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self(format!("{prefix}{digits}")))
    }

    /// Borrow the canonical identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report whether this is a property identifier (`P` prefix).
    #[must_use]
    pub fn is_property(&self) -> bool {
        self.0.starts_with('P')
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for EntityId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One value extracted from a claim, with its wire-level shape preserved.
///
/// Classification happens once, when the raw record is parsed; downstream
/// normalisation dispatches on the tag rather than re-inspecting payloads.
/// The `Other` variant carries payloads with no recognised shape so callers
/// can still log or pass them through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// A reference to another entity.
    EntityRef(EntityId),
    /// A timestamp string with a leading sign, e.g. `+1992-12-07T00:00:00Z`.
    Time(String),
    /// A coordinate pair with `x = longitude` and `y = latitude`.
    Coordinates(Coord<f64>),
    /// Monolingual text.
    Monolingual(String),
    /// A plain string scalar (usernames, catalogue numbers, URLs).
    Text(String),
    /// A plain numeric scalar.
    Number(f64),
    /// An unrecognised payload, kept verbatim.
    Other(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Q42", Some("Q42"))]
    #[case(" q42 ", Some("Q42"))]
    #[case("P131", Some("P131"))]
    #[case("p17", Some("P17"))]
    #[case("Queen", None)]
    #[case("Q", None)]
    #[case("Q42b", None)]
    #[case("42", None)]
    #[case("", None)]
    fn parses_identifier_shapes(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            EntityId::parse(raw).as_ref().map(EntityId::as_str),
            expected
        );
    }

    #[rstest]
    fn distinguishes_properties_from_items() {
        let item = EntityId::parse("Q220").expect("item id");
        let property = EntityId::parse("P19").expect("property id");
        assert!(!item.is_property());
        assert!(property.is_property());
    }
}
