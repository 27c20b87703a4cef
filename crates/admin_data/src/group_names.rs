//! Memoized group-name resolution shared by the goal and user joins.
//!
//! A listing pass resolves each distinct group id at most once per call; the
//! lookups are issued together so latency is paid roughly once, not once per
//! group. The resolved table is call-local — group names are allowed to go
//! stale between calls, never within one.

use firestore_rest::{Document, DocumentStore, FirestoreError};
use futures_util::future;
use std::collections::HashMap;

pub(crate) const UNNAMED_GROUP: &str = "Unnamed Group";

/// Distinct nonempty group ids in first-seen order.
pub(crate) fn distinct_group_ids<'a>(ids: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for id in ids.flatten() {
        if !id.is_empty() && !distinct.iter().any(|d| d == id) {
            distinct.push(id.to_string());
        }
    }
    distinct
}

async fn lookup_all<S: DocumentStore + ?Sized>(
    store: &S,
    ids: &[String],
) -> Vec<Result<Option<Document>, FirestoreError>> {
    future::join_all(ids.iter().map(|id| store.get_document("groups", id))).await
}

fn name_of(doc: &Document) -> String {
    doc.str_field("name")
        .map(str::to_owned)
        .unwrap_or_else(|| UNNAMED_GROUP.to_string())
}

/// Resolve names for `ids`; any failed lookup aborts the whole resolution.
/// Missing groups stay out of the table and render as the caller's default.
pub(crate) async fn resolve_strict<S: DocumentStore + ?Sized>(
    store: &S,
    ids: Vec<String>,
) -> Result<HashMap<String, String>, FirestoreError> {
    let results = lookup_all(store, &ids).await;
    let mut names = HashMap::new();
    for (id, res) in ids.into_iter().zip(results) {
        if let Some(doc) = res? {
            names.insert(id, name_of(&doc));
        }
    }
    Ok(names)
}

/// Like [`resolve_strict`], but a failed lookup is logged and skipped so one
/// bad group does not take down the whole listing.
pub(crate) async fn resolve_lenient<S: DocumentStore + ?Sized>(
    store: &S,
    ids: Vec<String>,
) -> HashMap<String, String> {
    let results = lookup_all(store, &ids).await;
    let mut names = HashMap::new();
    for (id, res) in ids.into_iter().zip(results) {
        match res {
            Ok(Some(doc)) => {
                names.insert(id, name_of(&doc));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(group_id = %id, error = %err, "failed to fetch group name");
            }
        }
    }
    names
}
