//! Shared fixtures for the behaviour suites.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use melodico_core::{ClaimValue, EntityId, EntityRecord};
use tempfile::TempDir;

/// Parse an identifier that the test author promises is well-formed.
pub fn entity_id(raw: &str) -> EntityId {
    EntityId::parse(raw).unwrap_or_else(|| panic!("malformed test identifier {raw:?}"))
}

/// An entity-reference claim value.
pub fn entity_ref(raw: &str) -> ClaimValue {
    ClaimValue::EntityRef(entity_id(raw))
}

/// Assemble a record from label pairs and claim lists.
pub fn record(
    id: &str,
    labels: &[(&str, &str)],
    claims: Vec<(&str, Vec<ClaimValue>)>,
) -> EntityRecord {
    EntityRecord::new(
        entity_id(id),
        labels
            .iter()
            .map(|(language, label)| ((*language).to_owned(), (*label).to_owned()))
            .collect(),
        BTreeMap::new(),
        claims
            .into_iter()
            .map(|(property, values)| (property.to_owned(), values))
            .collect(),
    )
}

/// A UTF-8 path for an audit log inside `temp`.
pub fn audit_path(temp: &TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join(name))
        .unwrap_or_else(|path| panic!("temporary path {path:?} is not UTF-8"))
}

/// Read the audit log back as parsed JSON lines.
pub fn audit_lines(path: &Utf8PathBuf) -> Vec<serde_json::Value> {
    let contents = std::fs::read_to_string(path.as_std_path())
        .unwrap_or_else(|err| panic!("failed to read audit log {path}: {err}"));
    contents
        .lines()
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|err| panic!("malformed audit line {line:?}: {err}"))
        })
        .collect()
}
