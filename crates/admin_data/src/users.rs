//! User directory with the same memoized group-name join as the goal list,
//! but lenient: one unreachable group must not empty the whole member list.

use crate::dates::format_short_date;
use crate::fields::first_str;
use crate::group_names;
use firestore_rest::{Document, DocumentStore, Value};
use serde::Serialize;
use std::collections::HashMap;

pub const NO_GROUP: &str = "No Group";

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
}

/// All users with resolved group names; failures degrade to an empty list.
pub async fn fetch_all_users<S: DocumentStore + ?Sized>(store: &S) -> Vec<UserRecord> {
    let docs = match store.list_documents("users").await {
        Ok(docs) => docs,
        Err(err) => {
            tracing::error!(error = %err, "error fetching all users");
            return Vec::new();
        }
    };
    let ids = group_names::distinct_group_ids(docs.iter().map(user_group_id));
    let names = group_names::resolve_lenient(store, ids).await;
    docs.iter().map(|doc| build_user(doc, &names)).collect()
}

fn user_group_id(doc: &Document) -> Option<&str> {
    first_str(doc, &["groupId", "group_id"])
}

fn build_user(doc: &Document, names: &HashMap<String, String>) -> UserRecord {
    let group_id = user_group_id(doc).map(str::to_owned);
    let group_name = group_id
        .as_deref()
        .filter(|gid| !gid.is_empty())
        .and_then(|gid| names.get(gid))
        .cloned()
        .unwrap_or_else(|| NO_GROUP.to_string());

    UserRecord {
        id: doc.id().to_string(),
        name: first_str(doc, &["displayName", "name"]).unwrap_or("Unknown").to_string(),
        email: doc.str_field("email").unwrap_or_default().to_string(),
        role: doc.str_field("role").unwrap_or("member").to_string(),
        group_id,
        group_name,
        avatar_url: first_str(doc, &["photoURL", "avatarUrl"]).map(str::to_owned),
        // unlike goal dates, a string createdAt was never rendered
        created_at: doc
            .field("createdAt")
            .and_then(Value::as_timestamp)
            .map(format_short_date)
            .unwrap_or_default(),
    }
}
