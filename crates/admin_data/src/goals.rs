//! Group-goal aggregation for the dashboard's goal list.
//!
//! One list read of `group_goals`, at most one point read of `groups/{id}`
//! per distinct group id, and a derived progress percentage per goal. Output
//! order follows store order; nothing is written back.

use crate::dates::display_date;
use crate::group_names;
use firestore_rest::{Document, DocumentStore, FirestoreError, Value};
use serde::Serialize;
use std::collections::HashMap;

pub const UNKNOWN_GROUP: &str = "Unknown Group";
pub const UNTITLED_GOAL: &str = "Untitled Goal";
pub const DEFAULT_STATUS: &str = "ACTIVE";
/// Chapters in the reading plan when a goal does not carry its own total.
pub const DEFAULT_TOTAL_CHAPTERS: i64 = 260;

/// Presentation-ready goal record, one per `group_goals` document.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub participant_count: i64,
    /// Integer percentage; deliberately not clamped to 100, inconsistent
    /// stored counters are passed through as-is.
    pub progress: i64,
    pub target_range: Vec<String>,
    pub group_name: String,
    pub daily_stats: HashMap<String, i64>,
}

/// Fetch and aggregate all group goals.
///
/// The dashboard's original contract: never fails, any error degrades to an
/// empty list. Callers that need to distinguish "no goals" from "fetch
/// failed" should use [`try_fetch_goals`].
pub async fn fetch_goals<S: DocumentStore + ?Sized>(store: &S) -> Vec<Goal> {
    match try_fetch_goals(store).await {
        Ok(goals) => goals,
        Err(err) => {
            tracing::error!(error = %err, "error fetching goals");
            Vec::new()
        }
    }
}

/// Like [`fetch_goals`], but surfaces the failure instead of swallowing it.
pub async fn try_fetch_goals<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Vec<Goal>, FirestoreError> {
    let docs = store.list_documents("group_goals").await?;
    let ids = group_names::distinct_group_ids(docs.iter().map(|d| d.str_field("group_id")));
    let names = group_names::resolve_strict(store, ids).await?;
    Ok(docs.iter().map(|doc| build_goal(doc, &names)).collect())
}

fn build_goal(doc: &Document, group_names: &HashMap<String, String>) -> Goal {
    let group_name = match doc.str_field("group_id") {
        Some(gid) if !gid.is_empty() => group_names
            .get(gid)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string()),
        _ => UNKNOWN_GROUP.to_string(),
    };

    let total_cleared = doc.int_field("total_cleared_count").unwrap_or(0);
    let total_chapters = doc.int_field("total_chapters").unwrap_or(DEFAULT_TOTAL_CHAPTERS);

    Goal {
        id: doc.id().to_string(),
        title: doc.str_field("title").unwrap_or(UNTITLED_GOAL).to_string(),
        description: doc.str_field("description").unwrap_or_default().to_string(),
        start_date: display_date(doc.field("start_date")),
        end_date: display_date(doc.field("end_date")),
        status: doc.str_field("status").unwrap_or(DEFAULT_STATUS).to_string(),
        participant_count: doc.int_field("active_participant_count").unwrap_or(0),
        progress: progress_percent(total_cleared, total_chapters),
        target_range: string_array(doc.field("target_range")),
        group_name,
        daily_stats: int_map(doc.field("daily_stats")),
    }
}

/// `round(cleared / total * 100)`, half away from zero; `0` when the
/// denominator is missing or zero.
fn progress_percent(cleared: i64, total: i64) -> i64 {
    if total > 0 {
        ((cleared as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|vals| {
            vals.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

fn int_map(value: Option<&Value>) -> HashMap<String, i64> {
    value
        .and_then(Value::as_map)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(k, v)| v.as_i64().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}
