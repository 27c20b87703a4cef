//! Shared in-memory `DocumentStore` fake and document builders for unit
//! tests. Records point-read calls so tests can assert lookup counts, and
//! supports injected per-document delays and forced failures.
#![cfg(test)]

use async_trait::async_trait;
use firestore_rest::{ArrayValue, Document, DocumentStore, FirestoreError, MapValue, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeStore {
    collections: HashMap<String, Vec<Document>>,
    get_calls: Mutex<Vec<(String, String)>>,
    fail_lists: bool,
    failing_gets: HashSet<String>,
    get_delays: HashMap<String, Duration>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            get_calls: Mutex::new(Vec::new()),
            fail_lists: false,
            failing_gets: HashSet::new(),
            get_delays: HashMap::new(),
        }
    }

    pub fn with_documents(mut self, collection: &str, docs: Vec<Document>) -> Self {
        self.collections.insert(collection.to_string(), docs);
        self
    }

    /// Every list read fails, simulating an unreachable backend.
    pub fn with_failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    /// Point reads of this document id fail.
    pub fn with_failing_get(mut self, doc_id: &str) -> Self {
        self.failing_gets.insert(doc_id.to_string());
        self
    }

    /// Point reads of this document id complete only after `delay`.
    pub fn with_get_delay(mut self, doc_id: &str, delay: Duration) -> Self {
        self.get_delays.insert(doc_id.to_string(), delay);
        self
    }

    pub fn get_call_count(&self, collection: &str, doc_id: &str) -> usize {
        self.get_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, d)| c == collection && d == doc_id)
            .count()
    }

    fn backend_down() -> FirestoreError {
        FirestoreError::Api {
            status: 500,
            body: "backend unavailable".into(),
        }
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        if self.fail_lists {
            return Err(Self::backend_down());
        }
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Document>, FirestoreError> {
        self.get_calls
            .lock()
            .unwrap()
            .push((collection.to_string(), doc_id.to_string()));
        if let Some(delay) = self.get_delays.get(doc_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_gets.contains(doc_id) {
            return Err(Self::backend_down());
        }
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id() == doc_id))
            .cloned())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        if self.fail_lists {
            return Err(Self::backend_down());
        }
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.field(field) == Some(&value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError> {
        if self.fail_lists {
            return Err(Self::backend_down());
        }
        Ok(self.collections.get(collection).map_or(0, |d| d.len() as u64))
    }
}

pub fn doc(collection: &str, id: &str, fields: Vec<(&str, Value)>) -> Document {
    Document {
        name: format!("projects/test/databases/(default)/documents/{collection}/{id}"),
        fields: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        create_time: None,
        update_time: None,
    }
}

pub fn sval(s: &str) -> Value {
    Value::string(s)
}

pub fn ival(n: i64) -> Value {
    Value::Integer(n)
}

pub fn tsval(rfc3339: &str) -> Value {
    Value::Timestamp(rfc3339.parse().expect("timestamp"))
}

pub fn aval(items: Vec<Value>) -> Value {
    Value::Array(ArrayValue { values: items })
}

pub fn mval(entries: Vec<(&str, Value)>) -> Value {
    Value::Map(MapValue {
        fields: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    })
}
