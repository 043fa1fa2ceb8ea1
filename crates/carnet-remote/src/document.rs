//! Wire document representation and record conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::CollectionRecord;
use crate::error::Result;

/// A raw document as stored in a remote collection: an opaque identifier
/// plus a JSON object of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode the fields into a typed record, carrying the document id over.
    pub fn decode<R: CollectionRecord>(&self) -> Result<R> {
        let mut record: R = serde_json::from_value(self.fields.clone())?;
        record.set_id(self.id.clone());
        Ok(record)
    }
}

/// Serialize a record into its wire fields: the local `id` is dropped (it
/// lives outside the field object) and null-valued fields are stripped,
/// since the store rejects them on insert.
pub fn encode_fields<R: CollectionRecord>(record: &R) -> Result<Value> {
    let mut fields = serde_json::to_value(record)?;
    if let Value::Object(ref mut map) = fields {
        map.remove("id");
        map.retain(|_, value| !value.is_null());
    }
    Ok(fields)
}

/// Strip null-valued entries from a patch object before sending it.
pub fn strip_nulls(patch: &mut Value) {
    if let Value::Object(map) = patch {
        map.retain(|_, value| !value.is_null());
    }
}
