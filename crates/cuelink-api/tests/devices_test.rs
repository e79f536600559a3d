#![allow(clippy::unwrap_used)]
// Integration tests for the managed-devices resource using wiremock.

use std::num::NonZeroU64;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cuelink_api::{
    Credentials, CueClient, Error, FilterBuilder, GetAllApsParams, ListApsParams, LogicalOperator,
    SessionStore, TransportConfig,
};

const AP_PATH: &str = "/manageddevices/aps";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TempDir, CueClient) {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join(".session"));
    let credentials = Credentials {
        key_id: "KEY-1".into(),
        key_value: "secret-value".to_owned().into(),
        client_id: "api-client".into(),
        base_url: server.uri(),
    };
    let client =
        CueClient::with_transport(credentials, &TransportConfig::default(), store).unwrap();
    (server, dir, client)
}

/// A page of `count` devices with sequential box IDs starting at `first`.
fn page_body(first: u64, count: u64) -> Value {
    let devices: Vec<Value> = (first..first + count)
        .map(|boxid| json!({ "boxid": boxid, "name": format!("ap-{boxid}") }))
        .collect();
    json!({ "managedDevices": devices })
}

// ── Single page ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_aps_sends_version_header_and_defaults() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .and(header("Version", "19"))
        .and(query_param("startindex", "0"))
        .and(query_param("pagesize", "10"))
        .and(query_param("totalcountrequired", "false"))
        .and(query_param("sortby", "boxid"))
        .and(query_param("ascending", "true"))
        .and(query_param("fetchradios", "true"))
        .and(query_param("populatemeshinfo", "false"))
        .and(query_param("populatewiredinterfaces", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .managed_devices()
        .list_aps(&ListApsParams::default())
        .await
        .unwrap();

    assert_eq!(page.managed_devices.len(), 3);
    assert_eq!(page.managed_devices[0].name.as_deref(), Some("ap-0"));
}

#[tokio::test]
async fn list_aps_merges_filters_and_extras_into_query() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .and(query_param("operator", "OR"))
        .and(query_param(
            "filter",
            r#"{"property":"name","operator":"contains","value":["Arista"]}"#,
        ))
        .and(query_param("active", "true"))
        .and(query_param("locationid", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "managedDevices": [],
            "totalCount": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ListApsParams {
        total_count_required: true,
        location_id: Some(42),
        filters: Some(FilterBuilder::new(LogicalOperator::Or).contains("name", "Arista")),
        extra: vec![("active".to_owned(), json!(true))],
        ..ListApsParams::default()
    };
    let page = client.managed_devices().list_aps(&params).await.unwrap();
    assert_eq!(page.total_count, Some(0));
}

#[tokio::test]
async fn list_aps_propagates_http_errors() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("session expired"))
        .mount(&server)
        .await;

    let err = client
        .managed_devices()
        .list_aps(&ListApsParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
    assert!(err.is_auth_expired());
}

// ── Full pagination ─────────────────────────────────────────────────

#[tokio::test]
async fn get_all_walks_pages_until_a_short_one() {
    let (server, _dir, client) = setup().await;

    // Pages of 100, 100, 50: the short page terminates the walk after
    // exactly three requests at startindex 0, 100, 200.
    for (start, count) in [(0u64, 100u64), (100, 100), (200, 50)] {
        Mock::given(method("GET"))
            .and(path(AP_PATH))
            .and(query_param("startindex", start.to_string()))
            .and(query_param("pagesize", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(start, count)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = client
        .managed_devices()
        .get_all_aps(&GetAllApsParams::default())
        .await
        .unwrap();

    assert_eq!(all.len(), 250);
    // Fetch order is preserved across page boundaries.
    for (i, ap) in all.iter().enumerate() {
        assert_eq!(ap.boxid, Some(i as i64));
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn get_all_stops_after_one_short_first_page() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .and(query_param("startindex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let all = client
        .managed_devices()
        .get_all_aps(&GetAllApsParams::default())
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_all_handles_an_empty_first_page() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "managedDevices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let all = client
        .managed_devices()
        .get_all_aps(&GetAllApsParams::default())
        .await
        .unwrap();

    assert!(all.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_all_forwards_filters_on_every_page() {
    let (server, _dir, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .and(query_param("operator", "AND"))
        .and(query_param(
            "filter",
            r#"{"property":"active","operator":"=","value":[true]}"#,
        ))
        .and(query_param("startindex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 5)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .and(query_param("operator", "AND"))
        .and(query_param("startindex", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "managedDevices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let params = GetAllApsParams {
        page_size: 5,
        filters: Some(FilterBuilder::new(LogicalOperator::And).equals("active", true)),
        ..GetAllApsParams::default()
    };
    let all = client.managed_devices().get_all_aps(&params).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn get_all_respects_the_page_cap() {
    let (server, _dir, client) = setup().await;

    // A misbehaving server that always returns a full page.
    Mock::given(method("GET"))
        .and(path(AP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 10)))
        .mount(&server)
        .await;

    let params = GetAllApsParams {
        page_size: 10,
        max_pages: NonZeroU64::new(3),
        ..GetAllApsParams::default()
    };
    let err = client
        .managed_devices()
        .get_all_aps(&params)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PageLimit { pages: 3 }));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
