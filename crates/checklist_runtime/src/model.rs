//! Persisted checklist document types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version written by the current runtime.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A single checklist. Its shape belongs to the application and passes through untouched.
pub type Checklist = Value;

/// Schema-0 payload: a bare sequence of checklists with no version tag.
pub type LegacyChecklists = Vec<Checklist>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned checklist collection stored under the current data key.
pub struct PersistedDocument {
    /// Schema tag.
    pub version: u32,
    /// Checklists in display order.
    pub checklists: Vec<Checklist>,
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            checklists: Vec::new(),
        }
    }
}

impl PersistedDocument {
    /// Wraps a schema-0 checklist sequence in a current-schema document.
    pub fn from_legacy(checklists: LegacyChecklists) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            checklists,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Initialization payload handed to the application at startup.
pub struct BootFlags {
    /// Document resolved by the bootstrap sequence.
    pub data: PersistedDocument,
    /// Startup time in unix milliseconds.
    pub time: u64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_document_is_empty_and_current() {
        let document = PersistedDocument::default();
        assert_eq!(document.version, CURRENT_SCHEMA_VERSION);
        assert!(document.checklists.is_empty());
    }

    #[test]
    fn document_serialization_shape_is_compatible() {
        let document = PersistedDocument::from_legacy(vec![json!({"id": "x"})]);
        assert_eq!(
            serde_json::to_string(&document).expect("serialize"),
            r#"{"version":1,"checklists":[{"id":"x"}]}"#
        );
    }

    #[test]
    fn boot_flags_expose_exactly_data_and_time() {
        let flags = BootFlags {
            data: PersistedDocument::default(),
            time: 42,
        };
        let value = serde_json::to_value(&flags).expect("serialize flags");
        assert_eq!(
            value,
            json!({"data": {"version": 1, "checklists": []}, "time": 42})
        );
    }
}
