//! Group directory reads: the group list, a single group's detail view, and
//! its member roster.

use crate::fields::{first_int, first_str};
use firestore_rest::{Document, DocumentStore, Value};
use serde::Serialize;

pub const UNNAMED_GROUP: &str = "Unnamed Group";
pub const UNKNOWN_LEADER: &str = "Unknown Leader";

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub leader_name: String,
    pub member_count: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// All groups; failures degrade to an empty list.
pub async fn fetch_groups<S: DocumentStore + ?Sized>(store: &S) -> Vec<GroupSummary> {
    match store.list_documents("groups").await {
        Ok(docs) => docs.iter().map(build_summary).collect(),
        Err(err) => {
            tracing::error!(error = %err, "error fetching groups");
            Vec::new()
        }
    }
}

/// A single group, or `None` when missing or on failure.
pub async fn fetch_group_by_id<S: DocumentStore + ?Sized>(
    store: &S,
    group_id: &str,
) -> Option<GroupSummary> {
    match store.get_document("groups", group_id).await {
        Ok(found) => found.map(|doc| build_summary(&doc)),
        Err(err) => {
            tracing::error!(group_id, error = %err, "error fetching group details");
            None
        }
    }
}

/// Members of a group, via an equality query on `users.groupId`.
pub async fn fetch_group_members<S: DocumentStore + ?Sized>(
    store: &S,
    group_id: &str,
) -> Vec<GroupMember> {
    match store
        .query_by_field("users", "groupId", Value::string(group_id))
        .await
    {
        Ok(docs) => docs.iter().map(build_member).collect(),
        Err(err) => {
            tracing::error!(group_id, error = %err, "error fetching group members");
            Vec::new()
        }
    }
}

fn build_summary(doc: &Document) -> GroupSummary {
    GroupSummary {
        id: doc.id().to_string(),
        name: first_str(doc, &["name", "groupName", "group_name"])
            .unwrap_or(UNNAMED_GROUP)
            .to_string(),
        leader_name: first_str(doc, &["leaderName", "leader_name"])
            .unwrap_or(UNKNOWN_LEADER)
            .to_string(),
        member_count: first_int(doc, &["memberCount", "member_count"]).unwrap_or(0),
    }
}

fn build_member(doc: &Document) -> GroupMember {
    GroupMember {
        id: doc.id().to_string(),
        name: doc.str_field("displayName").unwrap_or("Unknown").to_string(),
        email: doc.str_field("email").unwrap_or_default().to_string(),
        role: doc.str_field("role").unwrap_or("Member").to_string(),
        avatar_url: doc.str_field("photoURL").map(str::to_owned),
    }
}
