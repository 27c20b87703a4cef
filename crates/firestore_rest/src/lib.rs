//! Read-only `DocumentStore` trait and typed wire model for the Firestore
//! REST API, plus a reqwest-based implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod retry;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl FirestoreError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => FirestoreError::Auth(body),
            404 => FirestoreError::NotFound(body),
            429 => FirestoreError::RateLimited(body),
            _ => FirestoreError::Api { status, body },
        }
    }

    /// Whether a retry can reasonably be expected to succeed. Reads are
    /// idempotent, so retrying these is always safe.
    pub fn is_transient(&self) -> bool {
        match self {
            FirestoreError::Http(e) => e.is_timeout() || e.is_connect(),
            FirestoreError::RateLimited(_) => true,
            FirestoreError::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

/// A Firestore REST value. External serde tagging matches the wire shape
/// exactly: `{"stringValue": "..."}`, `{"integerValue": "42"}`, etc.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Value {
    #[serde(rename = "nullValue")]
    Null(()),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// Sent as a decimal string on the wire; tolerates a bare JSON number.
    #[serde(rename = "integerValue", with = "int64_codec")]
    Integer(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "timestampValue")]
    Timestamp(DateTime<Utc>),
    #[serde(rename = "stringValue")]
    String(String),
    /// Base64 payload, kept opaque.
    #[serde(rename = "bytesValue")]
    Bytes(String),
    /// Full resource name of another document.
    #[serde(rename = "referenceValue")]
    Reference(String),
    #[serde(rename = "geoPointValue")]
    GeoPoint { latitude: f64, longitude: f64 },
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Value>,
}

mod int64_codec {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(v: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("invalid integerValue: {s}"))),
        }
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(&a.values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(&m.fields),
            _ => None,
        }
    }
}

/// A document as returned by the REST API. `name` is the full resource path
/// (`projects/{p}/databases/(default)/documents/{collection}/{id}`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Value>,
    #[serde(rename = "createTime", default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(rename = "updateTime", default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Document id: the last segment of the resource path.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn int_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }
}

/// Read-only access to the document store. The dashboard never writes.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// All documents of a collection, in server-returned order.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError>;

    /// Point read. A missing document is `Ok(None)`, not an error.
    async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Document>, FirestoreError>;

    /// Documents whose `field` equals `value` (`:runQuery` equality filter).
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<Document>, FirestoreError>;

    /// Server-side document count (`:runAggregationQuery`).
    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError>;
}
