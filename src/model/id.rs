//! Record identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an inventory record.
///
/// The Spring backend issues numeric ids, while records saved through the
/// dashboard's JSON-file route carry millisecond-timestamp strings. Both are
/// accepted and displayed as the bare value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// `true` for the placeholder id carried by records not yet saved.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        matches!(self, RecordId::Int(0))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Int(0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_text_ids_deserialize() {
        let numeric: RecordId = serde_json::from_value(json!(42)).unwrap();
        let text: RecordId = serde_json::from_value(json!("1700000000000")).unwrap();
        assert_eq!(numeric, RecordId::Int(42));
        assert_eq!(text, RecordId::Text("1700000000000".to_string()));
    }

    #[test]
    fn test_display_is_bare_value() {
        assert_eq!(RecordId::from(7).to_string(), "7");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_default_is_unsaved() {
        assert!(RecordId::default().is_unsaved());
        assert!(!RecordId::from(3).is_unsaved());
        assert!(!RecordId::from("0").is_unsaved());
    }
}
