//! Contact record model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the contact's identifier in the remote schema.
pub const ID_FIELD: &str = "id";

/// Field this crate appends with the 1-based output position.
pub const SEQUENCE_FIELD: &str = "sequence";

/// A contact record as returned by the remote CRM.
///
/// The remote schema is not fixed, so the record is carried as an opaque
/// JSON object. The only fields this crate touches are `id` (read for
/// deduplication) and `sequence` (written once, in final output order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contact {
    fields: Map<String, Value>,
}

impl Contact {
    /// Create a contact from raw fields
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw `id` value, if the record has one
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD)
    }

    /// The `id` as a string, when it actually is one
    pub fn id_str(&self) -> Option<&str> {
        self.id().and_then(Value::as_str)
    }

    /// Whether the record carries the expected string-typed `id`
    pub fn has_string_id(&self) -> bool {
        self.id_str().is_some()
    }

    /// Raw `id` value for reporting; a missing id is reported as JSON null
    pub fn id_value(&self) -> Value {
        self.id().cloned().unwrap_or(Value::Null)
    }

    /// Canonical dedup key for the `id` value.
    ///
    /// The key is the JSON rendering of the raw value, so string ids stay
    /// distinct from numeric ones and all records with a missing id collide
    /// with each other under `null`.
    pub fn id_key(&self) -> String {
        self.id_value().to_string()
    }

    /// Set the 1-based sequence number assigned in final output order
    pub fn set_sequence(&mut self, sequence: u64) {
        self.fields
            .insert(SEQUENCE_FIELD.to_string(), Value::from(sequence));
    }

    /// The assigned sequence number, once set
    pub fn sequence(&self) -> Option<u64> {
        self.fields.get(SEQUENCE_FIELD).and_then(Value::as_u64)
    }

    /// All fields of the record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
