//! Messages crossing the boundary between the runtime and the checklist application.

use serde::Serialize;
use serde_json::{json, Value};

use crate::model::PersistedDocument;

/// Wire tag of a save request.
pub const SAVE_MESSAGE_TYPE: &str = "save";

#[derive(Debug, Clone, PartialEq)]
/// Message emitted by the application on its single outbound channel.
pub enum OutboundMessage {
    /// Persist `data` under the current data key.
    Save {
        /// Value to persist, expected to be a current-schema document.
        data: Value,
    },
    /// Any kind this runtime does not act on. Logged and dropped.
    Unrecognized {
        /// Wire tag as received, or an empty string when absent.
        kind: String,
    },
}

impl OutboundMessage {
    /// Builds a save request for `document`.
    pub fn save(document: &PersistedDocument) -> Self {
        Self::Save {
            data: json!({
                "version": document.version,
                "checklists": document.checklists,
            }),
        }
    }

    /// Returns the wire tag of this message.
    pub fn kind(&self) -> &str {
        match self {
            Self::Save { .. } => SAVE_MESSAGE_TYPE,
            Self::Unrecognized { kind } => kind,
        }
    }

    /// Decodes the `{ "type": ..., "data": ... }` wire form.
    ///
    /// Unknown, missing, or non-string tags become [`OutboundMessage::Unrecognized`], as does a
    /// save without a `data` field.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::Unrecognized {
                kind: String::new(),
            };
        };
        let kind = match object.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => String::new(),
        };
        match object.remove("data") {
            Some(data) if kind == SAVE_MESSAGE_TYPE => Self::Save { data },
            _ => Self::Unrecognized { kind },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Message the runtime delivers to the application.
pub enum InboundMessage {
    /// Periodic clock tick.
    Tick {
        /// Current time in unix milliseconds.
        time: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the runtime did with an outbound message.
pub enum MessageOutcome {
    /// The payload was written to storage.
    Saved {
        /// Key written.
        key: String,
        /// Length of the serialized payload in bytes.
        bytes: usize,
    },
    /// The message kind was not recognized; nothing was written.
    Ignored {
        /// Wire tag of the ignored message.
        kind: String,
    },
}
