//! HTTP client for the Firestore REST API.
//!
//! This module provides a reqwest-based implementation of the
//! [`DocumentStore`](crate::DocumentStore) trait. Authentication uses the
//! Firebase web API key as a `key` query parameter, matching how the
//! dashboard's web client is configured.

use crate::retry::RetryPolicy;
use crate::{Document, DocumentStore, FirestoreError, Value};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const PAGE_SIZE: &str = "300";

/// Client for the Firestore REST API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFirestoreClient {
    base_url: String,
    project_id: String,
    api_key: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestFirestoreClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the REST endpoint (e.g., "https://firestore.googleapis.com")
    /// * `project_id` - The Firebase project id
    /// * `api_key` - The Firebase web API key
    pub fn new(base_url: &str, project_id: impl Into<String>, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key,
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the transient-failure retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Root of the default database's document tree.
    fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .query(&[("key", self.api_key.expose_secret())])
    }

    /// Build an authenticated POST request.
    fn post_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
    }

    /// Execute a request and expect a JSON response.
    async fn send_json<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, FirestoreError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> FirestoreError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        FirestoreError::from_status(status, body_snippet)
    }
}

#[derive(Deserialize)]
struct ListDocumentsPage {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RunQueryEntry {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Deserialize)]
struct AggregationEntry {
    #[serde(default)]
    result: Option<AggregationResult>,
}

#[derive(Deserialize)]
struct AggregationResult {
    #[serde(rename = "aggregateFields", default)]
    aggregate_fields: HashMap<String, Value>,
}

#[async_trait]
impl DocumentStore for ReqwestFirestoreClient {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page: ListDocumentsPage = self
                .retry
                .retry_async(
                    || {
                        let mut req = self.get_request(&url).query(&[("pageSize", PAGE_SIZE)]);
                        if let Some(token) = page_token.as_deref() {
                            req = req.query(&[("pageToken", token)]);
                        }
                        Self::send_json(req)
                    },
                    FirestoreError::is_transient,
                )
                .await?;
            tracing::debug!(collection, count = page.documents.len(), "fetched document page");
            docs.extend(page.documents);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(docs)
    }

    async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Document>, FirestoreError> {
        let url = format!("{}/{}/{}", self.documents_root(), collection, doc_id);
        self.retry
            .retry_async(
                || {
                    let req = self.get_request(&url);
                    async move {
                        let resp = req.send().await?;
                        if resp.status().as_u16() == 404 {
                            return Ok(None);
                        }
                        if !resp.status().is_success() {
                            return Err(Self::error_from_response(resp).await);
                        }
                        Ok(Some(resp.json::<Document>().await?))
                    }
                },
                FirestoreError::is_transient,
            )
            .await
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_root());
        let wire_value =
            serde_json::to_value(&value).map_err(|e| FirestoreError::Decode(e.to_string()))?;
        let body = json!({
            "structuredQuery": {
                "from": [{"collectionId": collection}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": field},
                    "op": "EQUAL",
                    "value": wire_value,
                }}
            }
        });
        let entries: Vec<RunQueryEntry> = self
            .retry
            .retry_async(
                || Self::send_json(self.post_request(&url).json(&body)),
                FirestoreError::is_transient,
            )
            .await?;
        // Entries carrying only a readTime have no document.
        Ok(entries.into_iter().filter_map(|e| e.document).collect())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError> {
        let url = format!("{}:runAggregationQuery", self.documents_root());
        let body = json!({
            "structuredAggregationQuery": {
                "structuredQuery": {"from": [{"collectionId": collection}]},
                "aggregations": [{"alias": "count", "count": {}}]
            }
        });
        let entries: Vec<AggregationEntry> = self
            .retry
            .retry_async(
                || Self::send_json(self.post_request(&url).json(&body)),
                FirestoreError::is_transient,
            )
            .await?;
        entries
            .iter()
            .find_map(|e| {
                e.result
                    .as_ref()?
                    .aggregate_fields
                    .get("count")?
                    .as_i64()
            })
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| {
                FirestoreError::Decode(format!("missing count aggregate for {collection}"))
            })
    }
}
