//! Headline counters for the dashboard landing screen.

use firestore_rest::DocumentStore;
use futures_util::future::try_join;
use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub member_count: u64,
    pub group_count: u64,
    pub chapters_read: u64,
    pub completion_rate: f64,
}

/// Member and group counts, issued concurrently; any failure degrades to
/// all-zero stats.
pub async fn fetch_dashboard_stats<S: DocumentStore + ?Sized>(store: &S) -> DashboardStats {
    let counts = try_join(
        store.count_documents("users"),
        store.count_documents("groups"),
    )
    .await;
    match counts {
        Ok((member_count, group_count)) => DashboardStats {
            member_count,
            group_count,
            // zero until a reading-log collection exists to aggregate
            ..DashboardStats::default()
        },
        Err(err) => {
            tracing::error!(error = %err, "error fetching dashboard stats");
            DashboardStats::default()
        }
    }
}
