//! User directory and dashboard counters through the real REST client.

use admin_data::dashboard;
use admin_data::users;
use firestore_rest::http_client::ReqwestFirestoreClient;
use firestore_rest::retry::RetryPolicy;
use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/v1/projects/reading-goals/databases/(default)/documents";

fn client_for(server: &MockServer) -> ReqwestFirestoreClient {
    ReqwestFirestoreClient::new(&server.uri(), "reading-goals", SecretString::new("tok".into()))
        .with_retry(RetryPolicy::none())
}

#[tokio::test]
async fn user_directory_resolves_group_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_PATH}/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                {
                    "name": "projects/reading-goals/databases/(default)/documents/users/u1",
                    "fields": {
                        "displayName": {"stringValue": "Hana"},
                        "email": {"stringValue": "hana@example.com"},
                        "groupId": {"stringValue": "g1"},
                        "createdAt": {"timestampValue": "2024-11-23T08:00:00Z"}
                    }
                },
                {
                    "name": "projects/reading-goals/databases/(default)/documents/users/u2",
                    "fields": {}
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_PATH}/groups/g1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/reading-goals/databases/(default)/documents/groups/g1",
            "fields": {"name": {"stringValue": "Morning Readers"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = users::fetch_all_users(&client_for(&server)).await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].group_name, "Morning Readers");
    assert_eq!(list[0].created_at, "11/23/2024");
    assert_eq!(list[1].group_name, users::NO_GROUP);
    assert_eq!(list[1].name, "Unknown");
}

#[tokio::test]
async fn dashboard_counts_both_collections() {
    let server = MockServer::start().await;
    let count_body = |n: &str| {
        serde_json::json!([
            {"result": {"aggregateFields": {"count": {"integerValue": n}}}}
        ])
    };
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_PATH}:runAggregationQuery")))
        .and(body_partial_json(serde_json::json!({
            "structuredAggregationQuery": {"structuredQuery": {"from": [{"collectionId": "users"}]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body("42")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_PATH}:runAggregationQuery")))
        .and(body_partial_json(serde_json::json!({
            "structuredAggregationQuery": {"structuredQuery": {"from": [{"collectionId": "groups"}]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body("7")))
        .mount(&server)
        .await;

    let stats = dashboard::fetch_dashboard_stats(&client_for(&server)).await;
    assert_eq!(stats.member_count, 42);
    assert_eq!(stats.group_count, 7);
    assert_eq!(stats.chapters_read, 0);
}

#[tokio::test]
async fn dashboard_failure_degrades_to_zeroes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_PATH}:runAggregationQuery")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let stats = dashboard::fetch_dashboard_stats(&client_for(&server)).await;
    assert_eq!(stats.member_count, 0);
    assert_eq!(stats.group_count, 0);
}
