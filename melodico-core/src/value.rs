use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tabular cell.
///
/// Datasets loaded from CSV carry text cells; numeric cells appear when the
/// engine derives them (coordinates) or when a loader chooses to parse them.
/// `Null` is the dataset's native null marker.
///
/// # Examples
/// ```
/// use melodico_core::Value;
///
/// assert!(Value::Null.is_missing());
/// assert!(Value::from("   ").is_missing());
/// assert!(!Value::from("Lazio").is_missing());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Free text, including the empty string.
    Text(String),
    /// A numeric cell.
    Number(f64),
    /// The dataset's null marker.
    Null,
}

impl Value {
    /// Report whether the cell counts as missing for imputation purposes.
    ///
    /// A cell is missing iff it is the null marker, an empty or
    /// whitespace-only string, or a NaN number. The predicate never panics,
    /// whatever the variant.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(number) => number.is_nan(),
            Self::Null => true,
        }
    }

    /// Borrow the text content, when the cell is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, true)]
    #[case(Value::Text(String::new()), true)]
    #[case(Value::Text("   \t".to_owned()), true)]
    #[case(Value::Text("Milano".to_owned()), false)]
    #[case(Value::Number(f64::NAN), true)]
    #[case(Value::Number(0.0), false)]
    #[case(Value::Number(-12.5), false)]
    fn missing_predicate(#[case] value: Value, #[case] missing: bool) {
        assert_eq!(value.is_missing(), missing);
    }

    #[rstest]
    fn serialises_without_tags() {
        let text = serde_json::to_string(&Value::from("ciao")).expect("serialise text");
        assert_eq!(text, "\"ciao\"");
        let number = serde_json::to_string(&Value::Number(9.25)).expect("serialise number");
        assert_eq!(number, "9.25");
        let null = serde_json::to_string(&Value::Null).expect("serialise null");
        assert_eq!(null, "null");
    }

    #[rstest]
    fn displays_null_as_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("x").to_string(), "x");
    }
}
