//! Tiered decoding of the stored checklist document.
//!
//! Resolution walks `Start -> ReadCurrent -> ReadLegacy -> Ready`, stopping at the first tier
//! that yields a usable value. Every failure along the way is logged and falls through; the last
//! tier is the empty default, so resolution always succeeds.

use leptos::logging;
use platform_host::PersistentStore;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::BootConfig;
use crate::model::{LegacyChecklists, PersistedDocument, CURRENT_SCHEMA_VERSION};

#[derive(Debug, Error)]
/// Reasons a stored value could not be used.
pub enum DecodeError {
    /// The text is not JSON.
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A current-schema document must be a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },
    /// A legacy payload must be a JSON array.
    #[error("expected a JSON array, found {found}")]
    NotAnArray {
        /// JSON kind that was found instead.
        found: &'static str,
    },
    /// The object lacks `version` or `checklists`, or one of them has the wrong type.
    #[error("malformed document: {0}")]
    Shape(#[source] serde_json::Error),
    /// The document was written by a newer schema than this runtime understands.
    #[error("schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version tag found in storage.
        found: u64,
        /// Highest version this runtime reads.
        supported: u32,
    },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stored form of a versioned document, before the version check.
#[derive(Deserialize)]
struct StoredDocument {
    version: u64,
    checklists: LegacyChecklists,
}

/// Decodes text stored under the current key and normalizes it to the current schema.
///
/// Checklist elements are not inspected.
///
/// # Errors
///
/// Returns [`DecodeError`] when the text is not a `{version, checklists}` object or carries a
/// version newer than [`CURRENT_SCHEMA_VERSION`].
pub fn decode_current(raw: &str) -> Result<PersistedDocument, DecodeError> {
    let value = serde_json::from_str::<Value>(raw)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject {
            found: json_kind(&value),
        });
    }

    let stored: StoredDocument = serde_json::from_value(value).map_err(DecodeError::Shape)?;
    if stored.version > u64::from(CURRENT_SCHEMA_VERSION) {
        return Err(DecodeError::UnsupportedVersion {
            found: stored.version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(PersistedDocument {
        version: CURRENT_SCHEMA_VERSION,
        checklists: stored.checklists,
    })
}

/// Decodes a schema-0 bare checklist sequence.
///
/// # Errors
///
/// Returns [`DecodeError`] when the text is not a JSON array.
pub fn decode_legacy(raw: &str) -> Result<LegacyChecklists, DecodeError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(checklists) => Ok(checklists),
        other => Err(DecodeError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Tier that produced the initial document.
pub enum BootSource {
    /// Decoded from the current key.
    Current,
    /// Wrapped from the legacy key.
    Legacy,
    /// Neither key was usable.
    Default,
}

impl BootSource {
    /// Returns a stable token for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Bootstrap result: a current-schema document plus the tier it came from.
pub struct ResolvedDocument {
    /// Normalized document.
    pub document: PersistedDocument,
    /// Tier that produced it.
    pub source: BootSource,
}

#[derive(Debug, Clone, PartialEq)]
/// Steps of the bootstrap resolution.
pub enum BootState {
    /// Nothing has been read yet.
    Start,
    /// About to read the current key.
    ReadCurrent,
    /// The current key was absent or unusable; about to read the legacy key.
    ReadLegacy,
    /// Resolution finished.
    Ready(ResolvedDocument),
}

impl BootState {
    /// Performs one transition, reading storage as needed.
    pub fn advance(self, storage: &dyn PersistentStore, config: &BootConfig) -> Self {
        match self {
            Self::Start => Self::ReadCurrent,
            Self::ReadCurrent => match read_current(storage, &config.data_key) {
                Some(document) => Self::Ready(ResolvedDocument {
                    document,
                    source: BootSource::Current,
                }),
                None => Self::ReadLegacy,
            },
            Self::ReadLegacy => match read_legacy(storage, &config.legacy_key) {
                Some(checklists) => Self::Ready(ResolvedDocument {
                    document: PersistedDocument::from_legacy(checklists),
                    source: BootSource::Legacy,
                }),
                None => Self::Ready(ResolvedDocument {
                    document: PersistedDocument::default(),
                    source: BootSource::Default,
                }),
            },
            ready @ Self::Ready(_) => ready,
        }
    }
}

/// Runs the bootstrap resolution to completion.
pub fn resolve_document(storage: &dyn PersistentStore, config: &BootConfig) -> ResolvedDocument {
    let mut state = BootState::Start;
    loop {
        state = match state {
            BootState::Ready(resolved) => return resolved,
            pending => pending.advance(storage, config),
        };
    }
}

fn read_current(storage: &dyn PersistentStore, key: &str) -> Option<PersistedDocument> {
    let Ok(raw) = storage.read_persistent(key) else {
        logging::log!("no stored document under `{key}`");
        return None;
    };
    match decode_current(&raw) {
        Ok(document) => Some(document),
        Err(err) => {
            logging::warn!("stored document under `{key}` is unusable: {err}");
            None
        }
    }
}

fn read_legacy(storage: &dyn PersistentStore, key: &str) -> Option<LegacyChecklists> {
    let Ok(raw) = storage.read_persistent(key) else {
        logging::log!("no legacy checklists under `{key}`");
        return None;
    };
    match decode_legacy(&raw) {
        Ok(checklists) => {
            logging::log!("migrating {} legacy checklists from `{key}`", checklists.len());
            Some(checklists)
        }
        Err(err) => {
            logging::warn!("legacy checklists under `{key}` are unusable: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryPersistentStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn resolve(entries: &[(&str, &str)]) -> ResolvedDocument {
        let store = MemoryPersistentStore::with_entries(entries.iter().copied());
        resolve_document(&store, &BootConfig::default())
    }

    #[test]
    fn current_document_wins_over_legacy() {
        let resolved = resolve(&[
            ("data", r#"{"version":1,"checklists":[{"id":"x"}]}"#),
            ("checklists", r#"[{"id":"y"}]"#),
        ]);
        assert_eq!(resolved.source, BootSource::Current);
        assert_eq!(resolved.document.checklists, vec![json!({"id": "x"})]);
    }

    #[test]
    fn legacy_sequence_is_wrapped_at_current_version() {
        let resolved = resolve(&[("checklists", r#"[{"id":"y"},{"id":"z","items":[]}]"#)]);
        assert_eq!(resolved.source, BootSource::Legacy);
        assert_eq!(
            resolved.document,
            PersistedDocument {
                version: 1,
                checklists: vec![json!({"id": "y"}), json!({"id": "z", "items": []})],
            }
        );
    }

    #[test]
    fn malformed_current_falls_through_to_legacy() {
        for bad in [
            "not json",
            "[]",
            "null",
            r#"{"checklists":[]}"#,
            r#"{"version":"1","checklists":[]}"#,
            r#"{"version":1,"checklists":{}}"#,
            r#"{"version":1}"#,
        ] {
            let resolved = resolve(&[("data", bad), ("checklists", "[1]")]);
            assert_eq!(resolved.source, BootSource::Legacy, "input: {bad}");
            assert_eq!(resolved.document.checklists, vec![json!(1)]);
        }
    }

    #[test]
    fn newer_schema_is_not_read_as_current() {
        let resolved = resolve(&[("data", r#"{"version":2,"checklists":[{"id":"n"}]}"#)]);
        assert_eq!(resolved.source, BootSource::Default);
        assert_eq!(resolved.document, PersistedDocument::default());
    }

    #[test]
    fn older_explicit_version_is_normalized() {
        let resolved = resolve(&[("data", r#"{"version":0,"checklists":[{"id":"o"}]}"#)]);
        assert_eq!(resolved.source, BootSource::Current);
        assert_eq!(resolved.document.version, CURRENT_SCHEMA_VERSION);
        assert_eq!(resolved.document.checklists, vec![json!({"id": "o"})]);
    }

    #[test]
    fn unusable_legacy_yields_default() {
        for legacy in ["{oops", r#"{"id":"y"}"#, "\"[]\""] {
            let resolved = resolve(&[("data", "not json"), ("checklists", legacy)]);
            assert_eq!(resolved.source, BootSource::Default, "legacy: {legacy}");
            assert_eq!(resolved.document, PersistedDocument::default());
        }
        assert_eq!(resolve(&[]).source, BootSource::Default);
    }

    #[test]
    fn checklist_elements_pass_through_unvalidated() {
        let resolved = resolve(&[("checklists", r#"[null, 3, "x", {"anything": [true]}]"#)]);
        assert_eq!(
            resolved.document.checklists,
            vec![json!(null), json!(3), json!("x"), json!({"anything": [true]})]
        );
    }

    #[test]
    fn state_machine_visits_tiers_in_order() {
        let store = MemoryPersistentStore::default();
        let config = BootConfig::default();

        let state = BootState::Start.advance(&store, &config);
        assert_eq!(state, BootState::ReadCurrent);
        let state = state.advance(&store, &config);
        assert_eq!(state, BootState::ReadLegacy);
        let state = state.advance(&store, &config);
        let BootState::Ready(resolved) = state.clone() else {
            panic!("expected ready state, got {state:?}");
        };
        assert_eq!(resolved.source, BootSource::Default);
        assert_eq!(state.clone().advance(&store, &config), state);
    }

    #[test]
    fn configured_keys_are_honored() {
        let store = MemoryPersistentStore::with_entries([("v1", r#"[{"id":"k"}]"#)]);
        let config = BootConfig {
            data_key: "v2".to_string(),
            legacy_key: "v1".to_string(),
            ..BootConfig::default()
        };
        let resolved = resolve_document(&store, &config);
        assert_eq!(resolved.source, BootSource::Legacy);
    }

    #[test]
    fn decode_errors_describe_the_problem() {
        assert!(matches!(
            decode_current("[]"),
            Err(DecodeError::NotAnObject { found: "array" })
        ));
        assert!(matches!(
            decode_current(r#"{"version":9,"checklists":[]}"#),
            Err(DecodeError::UnsupportedVersion {
                found: 9,
                supported: 1
            })
        ));
        assert!(matches!(
            decode_current(r#"{"version":"1","checklists":[]}"#),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            decode_current(r#"{"version":1,"checklists":{}}"#),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            decode_current(r#"{"version":-1,"checklists":[]}"#),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            decode_legacy("{}"),
            Err(DecodeError::NotAnArray { found: "object" })
        ));
        assert!(matches!(decode_legacy("nope"), Err(DecodeError::Json(_))));
    }
}
