//! Conversion of stored product documents into JSON-safe values.
//!
//! The full document shape is preserved. Only three things are normalized:
//! object IDs become hex strings, non-finite doubles become `null`, and
//! datetimes become RFC 3339 strings. Every other BSON type without a direct
//! JSON counterpart is rendered as relaxed extended JSON.

use bson::{Bson, Document};
use serde_json::{Map, Value};

/// Serialize an optional stored document.
pub fn serialize_document(doc: Option<&Document>) -> Option<Value> {
    doc.map(document_to_json)
}

/// Serialize a stored document, field by field.
pub fn document_to_json(doc: &Document) -> Value {
    let map: Map<String, Value> = doc
        .iter()
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect();
    Value::Object(map)
}

/// Serialize a single BSON value.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        // `from_f64` rejects NaN and infinities.
        Bson::Double(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        other => other.clone().into_relaxed_extjson(),
    }
}
