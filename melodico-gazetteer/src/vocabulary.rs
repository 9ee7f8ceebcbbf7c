//! The geographic keyword tables and label canonicalisation.

use std::collections::{BTreeMap, BTreeSet};

/// Canonical region names plus the synonym and city tables used to map free
/// text and hint labels onto them.
///
/// All lookups go through a shared tidying step that folds en dashes to
/// hyphens, curly apostrophes to straight ones, collapses doubled spaces and
/// trims. Construction takes the tables as data so small fixtures can stand
/// in for the full gazetteer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionVocabulary {
    regions: BTreeSet<String>,
    synonyms: BTreeMap<String, String>,
    city_regions: BTreeMap<String, String>,
}

impl RegionVocabulary {
    /// Build a vocabulary from canonical regions, synonym pairs and
    /// city-to-region pairs.
    pub fn new<R, S, C>(regions: R, synonyms: S, city_regions: C) -> Self
    where
        R: IntoIterator<Item = String>,
        S: IntoIterator<Item = (String, String)>,
        C: IntoIterator<Item = (String, String)>,
    {
        Self {
            regions: regions.into_iter().collect(),
            synonyms: synonyms.into_iter().collect(),
            city_regions: city_regions.into_iter().collect(),
        }
    }

    /// The built-in Italian gazetteer: the twenty administrative regions,
    /// common alternate spellings (including English exonyms), and the
    /// cities that dominate the music corpus.
    #[must_use]
    pub fn italian() -> Self {
        let regions = [
            "Abruzzo",
            "Basilicata",
            "Calabria",
            "Campania",
            "Emilia-Romagna",
            "Friuli-Venezia-Giulia",
            "Lazio",
            "Liguria",
            "Lombardia",
            "Marche",
            "Molise",
            "Piemonte",
            "Puglia",
            "Sardegna",
            "Sicilia",
            "Toscana",
            "Trentino Alto Adige",
            "Umbria",
            "Valle d'Aosta",
            "Veneto",
        ]
        .into_iter()
        .map(str::to_owned);

        let synonyms = [
            ("Emilia", "Emilia-Romagna"),
            ("Emilia Romagna", "Emilia-Romagna"),
            ("Romagna", "Emilia-Romagna"),
            ("Friuli", "Friuli-Venezia-Giulia"),
            ("Friuli Venezia Giulia", "Friuli-Venezia-Giulia"),
            ("Trentino", "Trentino Alto Adige"),
            ("Alto Adige", "Trentino Alto Adige"),
            ("Trentino-Alto Adige", "Trentino Alto Adige"),
            ("Lombardy", "Lombardia"),
            ("Tuscany", "Toscana"),
            ("Piedmont", "Piemonte"),
            ("Sicily", "Sicilia"),
            ("Sardinia", "Sardegna"),
            ("Apulia", "Puglia"),
            ("Latium", "Lazio"),
            ("Aosta Valley", "Valle d'Aosta"),
        ]
        .into_iter()
        .map(|(alias, canonical)| (alias.to_owned(), canonical.to_owned()));

        let city_regions = [
            ("Milano", "Lombardia"),
            ("Brescia", "Lombardia"),
            ("Bergamo", "Lombardia"),
            ("Monza", "Lombardia"),
            ("Cinisello Balsamo", "Lombardia"),
            ("Sesto San Giovanni", "Lombardia"),
            ("Roma", "Lazio"),
            ("Napoli", "Campania"),
            ("Salerno", "Campania"),
            ("Torino", "Piemonte"),
            ("Bologna", "Emilia-Romagna"),
            ("Modena", "Emilia-Romagna"),
            ("Genova", "Liguria"),
            ("La Spezia", "Liguria"),
            ("Firenze", "Toscana"),
            ("Venezia", "Veneto"),
            ("Verona", "Veneto"),
            ("Padova", "Veneto"),
            ("Palermo", "Sicilia"),
            ("Catania", "Sicilia"),
            ("Cagliari", "Sardegna"),
            ("Olbia", "Sardegna"),
            ("Bari", "Puglia"),
            ("Taranto", "Puglia"),
            ("Trieste", "Friuli-Venezia-Giulia"),
            ("Perugia", "Umbria"),
            ("Ancona", "Marche"),
            ("L'Aquila", "Abruzzo"),
            ("Campobasso", "Molise"),
            ("Potenza", "Basilicata"),
            ("Catanzaro", "Calabria"),
            ("Aosta", "Valle d'Aosta"),
            ("Trento", "Trentino Alto Adige"),
            ("Bolzano", "Trentino Alto Adige"),
        ]
        .into_iter()
        .map(|(city, region)| (city.to_owned(), region.to_owned()));

        Self::new(regions, synonyms, city_regions)
    }

    /// Keywords scanned for directly: canonical regions plus synonym keys.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.regions
            .iter()
            .map(String::as_str)
            .chain(self.synonyms.keys().map(String::as_str))
    }

    /// The `(city, region)` pairs scanned with hits recorded against the
    /// mapped region.
    pub fn cities(&self) -> impl Iterator<Item = (&str, &str)> {
        self.city_regions
            .iter()
            .map(|(city, region)| (city.as_str(), region.as_str()))
    }

    /// Canonicalise a label that should name a region.
    ///
    /// Accepts the label when, after tidying, it is already canonical, maps
    /// through the synonym table, or maps through the synonym table once
    /// hyphens are replaced with spaces. Anything else yields `None`.
    ///
    /// # Examples
    /// ```
    /// use melodico_gazetteer::RegionVocabulary;
    ///
    /// let vocabulary = RegionVocabulary::italian();
    /// assert_eq!(vocabulary.canonical_region("Lombardy").as_deref(), Some("Lombardia"));
    /// assert_eq!(vocabulary.canonical_region("Emilia-Romagna").as_deref(), Some("Emilia-Romagna"));
    /// assert!(vocabulary.canonical_region("Milano").is_none());
    /// ```
    #[must_use]
    pub fn canonical_region(&self, label: &str) -> Option<String> {
        let cleaned = tidy(label);
        if cleaned.is_empty() {
            return None;
        }
        if self.regions.contains(&cleaned) {
            return Some(cleaned);
        }
        self.lookup_synonym(&cleaned)
    }

    /// Canonicalise a label that may name a region or a known city.
    ///
    /// Hint properties often resolve to cities; those are accepted verbatim
    /// (the caller decides whether to map the city onwards). Otherwise the
    /// behaviour matches [`RegionVocabulary::canonical_region`].
    #[must_use]
    pub fn canonical_place(&self, label: &str) -> Option<String> {
        let cleaned = tidy(label);
        if cleaned.is_empty() {
            return None;
        }
        if self.regions.contains(&cleaned) || self.city_regions.contains_key(&cleaned) {
            return Some(cleaned);
        }
        self.lookup_synonym(&cleaned)
    }

    fn lookup_synonym(&self, cleaned: &str) -> Option<String> {
        if let Some(canonical) = self.synonyms.get(cleaned) {
            return Some(canonical.clone());
        }
        let spaced = cleaned.replace('-', " ");
        self.synonyms.get(&spaced).cloned()
    }
}

/// Drop a trailing parenthetical or comma-separated qualifier from a label.
///
/// Labels resolved from the knowledge graph frequently carry
/// disambiguators — `"Roma (Italia)"`, `"Milano, Lombardia"` — that defeat
/// exact table lookups. The base name before the first `(` or `,` is
/// returned trimmed.
#[must_use]
pub fn strip_qualifier(label: &str) -> &str {
    let base = label.split('(').next().unwrap_or(label);
    base.split(',').next().unwrap_or(base).trim()
}

fn tidy(label: &str) -> String {
    label
        .replace('\u{2013}', "-")
        .replace('\u{2019}', "'")
        .replace("  ", " ")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vocabulary() -> RegionVocabulary {
        RegionVocabulary::italian()
    }

    #[rstest]
    #[case("Lazio", Some("Lazio"))]
    #[case("  Lazio ", Some("Lazio"))]
    #[case("Lombardy", Some("Lombardia"))]
    #[case("Emilia Romagna", Some("Emilia-Romagna"))]
    #[case("Trentino-Alto Adige", Some("Trentino Alto Adige"))]
    #[case("Milano", None)]
    #[case("Atlantide", None)]
    #[case("", None)]
    fn canonicalises_region_labels(
        vocabulary: RegionVocabulary,
        #[case] label: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(vocabulary.canonical_region(label).as_deref(), expected);
    }

    #[rstest]
    fn place_lookup_accepts_cities(vocabulary: RegionVocabulary) {
        assert_eq!(vocabulary.canonical_place("Roma").as_deref(), Some("Roma"));
        assert_eq!(
            vocabulary.canonical_place("Sicily").as_deref(),
            Some("Sicilia")
        );
        assert!(vocabulary.canonical_place("Marte").is_none());
    }

    #[rstest]
    fn tidies_dashes_and_apostrophes(vocabulary: RegionVocabulary) {
        assert_eq!(
            vocabulary.canonical_region("Valle d\u{2019}Aosta").as_deref(),
            Some("Valle d'Aosta")
        );
        assert_eq!(
            vocabulary.canonical_region("Emilia\u{2013}Romagna").as_deref(),
            Some("Emilia-Romagna")
        );
    }

    #[rstest]
    #[case("Roma (Italia)", "Roma")]
    #[case("Milano, Lombardia", "Milano")]
    #[case("Napoli", "Napoli")]
    fn strips_qualifiers(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(strip_qualifier(label), expected);
    }
}
