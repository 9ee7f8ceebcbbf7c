//! Candidate ranking and the confidence decision rule.

use std::collections::BTreeMap;

use log::debug;

use crate::vocabulary::RegionVocabulary;

/// Default count advantage the leading candidate must hold over the
/// runner-up before a guess is accepted.
pub const DEFAULT_MARGIN: usize = 1;

/// One region candidate found in a text scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMention {
    /// Candidate name: a keyword as scanned, or the region a city maps to.
    pub name: String,
    /// Total occurrences in the text.
    pub count: usize,
    /// Byte offset of the first occurrence.
    pub first_offset: usize,
}

/// Scan `text` for vocabulary keywords and rank the candidates.
///
/// The scan is case-insensitive and substring-based. Region and synonym
/// keywords are counted under their own name; city matches are counted
/// under the city's mapped region, merging with direct mentions of that
/// region. Candidates are ordered by descending count, then ascending first
/// offset, then name — the exact order callers rely on for determinism.
#[must_use]
pub fn rank_mentions(text: &str, vocabulary: &RegionVocabulary) -> Vec<RegionMention> {
    let lowered = text.to_lowercase();
    let mut tallies: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    let mut record = |name: &str, offset: usize| {
        let entry = tallies
            .entry(name.to_owned())
            .or_insert((0, offset));
        entry.0 += 1;
        if offset < entry.1 {
            entry.1 = offset;
        }
    };

    for keyword in vocabulary.keywords() {
        for (offset, _) in lowered.match_indices(&keyword.to_lowercase()) {
            record(keyword, offset);
        }
    }
    for (city, region) in vocabulary.cities() {
        for (offset, _) in lowered.match_indices(&city.to_lowercase()) {
            record(region, offset);
        }
    }

    let mut ranked: Vec<RegionMention> = tallies
        .into_iter()
        .map(|(name, (count, first_offset))| RegionMention {
            name,
            count,
            first_offset,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.first_offset.cmp(&b.first_offset))
            .then(a.name.cmp(&b.name))
    });
    ranked
}

/// Guess a region from free text, or return `None` without a confident
/// answer.
///
/// A single candidate is accepted outright (after canonicalisation). With
/// two or more, the leader is accepted only when its count exceeds the
/// runner-up's by more than `margin`; a near-tie produces no guess because
/// a wrong region is worse downstream than an absent one.
#[must_use]
pub fn infer_region(
    text: &str,
    vocabulary: &RegionVocabulary,
    margin: usize,
) -> Option<String> {
    let ranked = rank_mentions(text, vocabulary);
    match ranked.as_slice() {
        [] => None,
        [only] => vocabulary.canonical_region(&only.name),
        [leader, runner_up, ..] => {
            if leader.count > runner_up.count + margin {
                vocabulary.canonical_region(&leader.name)
            } else {
                debug!(
                    "no confident region: {} ({}) vs {} ({})",
                    leader.name, leader.count, runner_up.name, runner_up.count
                );
                None
            }
        }
    }
}
