//! Tests for the HTTP search executor

use super::*;
use crate::config::ClientConfig;
use crate::search::{CursorPhase, PagingScope, SearchCursor, SearchExecutor};
use crate::template::TemplateContext;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runtime driving the mock server; the service under test owns its own
fn mock_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn service_for<R: serde::de::DeserializeOwned>(server: &MockServer) -> SearchService<R> {
    let yaml = format!(
        "base_url: {}\nhttp:\n  max_retries: 0\nsearch:\n  page_size: 20\n  body_fields_only: false\n",
        server.uri()
    );
    let config = ClientConfig::from_yaml(&yaml, &TemplateContext::new()).unwrap();
    SearchService::new(&config).unwrap()
}

/// A record type with no `Default` impl
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Customer {
    #[serde(rename = "internalId")]
    internal_id: u64,
    #[serde(rename = "entityId")]
    entity_id: String,
}

fn page_body(page_index: u32, records: &[Value]) -> Value {
    json!({
        "searchResult": {
            "status": {"isSuccess": true, "statusDetail": null},
            "totalRecords": 3,
            "pageSize": 2,
            "totalPages": 2,
            "pageIndex": page_index,
            "searchId": "WEBSERVICES_abc",
            "recordList": {"record": records}
        }
    })
}

fn request_bodies(rt: &Runtime, server: &MockServer) -> Vec<Value> {
    rt.block_on(server.received_requests())
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[test]
fn test_execute_search_decodes_envelope() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(1, &[json!({"id": 1}), json!({"id": 2})])),
            )
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let envelope = service.execute_search(&json!({"type": "customer"})).unwrap();

    assert!(envelope.status.is_success);
    assert_eq!(envelope.page_index, Some(1));
    assert_eq!(envelope.page_size, Some(2));
    assert_eq!(envelope.total_pages, 2);
    assert_eq!(envelope.total_records, 3);
    assert_eq!(envelope.search_id.as_deref(), Some("WEBSERVICES_abc"));
    assert_eq!(
        envelope.records,
        Some(vec![json!({"id": 1}), json!({"id": 2})])
    );
}

#[test]
fn test_preferences_only_sent_inside_paging_scope() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, &[])))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    {
        let _scope = PagingScope::enter(&service, 100);
        assert_eq!(
            service.preferences(),
            Some(SearchPreferences {
                body_fields_only: false,
                return_search_columns: true,
                page_size: Some(100),
            })
        );
        service.execute_search_page("WEBSERVICES_abc", 2).unwrap();
    }
    assert_eq!(service.preferences(), None);
    service.execute_search(&json!({"type": "item"})).unwrap();

    let bodies = request_bodies(&rt, &server);
    assert_eq!(
        bodies,
        vec![
            json!({
                "searchId": "WEBSERVICES_abc",
                "pageIndex": 2,
                "searchPreferences": {
                    "bodyFieldsOnly": false,
                    "returnSearchColumns": true,
                    "pageSize": 100
                }
            }),
            json!({"searchRecord": {"type": "item"}}),
        ]
    );
}

#[test]
fn test_paging_disabled_omits_page_size() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    let service: SearchService<Value> = service_for(&server);

    service.set_paging_preferences(false, 100);
    assert_eq!(service.preferences().and_then(|p| p.page_size), None);
    service.clear_paging_preferences();
    assert_eq!(service.default_page_size(), 20);
}

#[test]
fn test_missing_record_list_is_none() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchResult": {
                    "status": {"isSuccess": true},
                    "totalRecords": 0,
                    "totalPages": 0,
                    "searchId": "empty"
                }
            })))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let envelope = service.execute_search(&json!({})).unwrap();
    assert_eq!(envelope.records, None);
    assert_eq!(envelope.page_index, None);
}

#[test]
fn test_failure_status_is_returned_not_raised() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchResult": {
                    "status": {
                        "isSuccess": false,
                        "statusDetail": [{
                            "code": "INSUFFICIENT_PERMISSION",
                            "message": "Permission Violation",
                            "type": "ERROR"
                        }]
                    }
                }
            })))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let envelope = service.execute_search(&json!({})).unwrap();
    assert!(!envelope.status.is_success);
    assert_eq!(envelope.status.status_detail[0].code, "INSUFFICIENT_PERMISSION");
}

#[test]
fn test_http_error_passes_through() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let err = service.execute_search(&json!({})).unwrap_err();
    assert!(matches!(err, crate::Error::HttpStatus { status: 403, .. }));
}

#[test]
fn test_unexpected_body_is_decode_error() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let err = service.execute_search(&json!({})).unwrap_err();
    assert!(matches!(err, crate::Error::Decode { .. }));
}

#[test]
fn test_typed_records_without_default() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                1,
                &[
                    json!({"internalId": 7, "entityId": "Acme"}),
                    json!({"internalId": 9, "entityId": "Globex"}),
                ],
            )))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/searchMoreWithId"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchResult": {
                    "status": {"isSuccess": true},
                    "totalRecords": 3,
                    "pageSize": 2,
                    "totalPages": 2,
                    "pageIndex": 2,
                    "searchId": "WEBSERVICES_abc",
                    "recordList": {"record": [{"internalId": 11, "entityId": "Initech"}]}
                }
            })))
            .mount(&server)
            .await;
    });

    let service: SearchService<Customer> = service_for(&server);
    let cursor = SearchCursor::with_page_size(&service, json!({"type": "customer"}), 2).unwrap();
    let customers: Vec<Customer> = cursor.collect::<crate::Result<_>>().unwrap();

    assert_eq!(
        customers.iter().map(|c| c.internal_id).collect::<Vec<_>>(),
        vec![7, 9, 11]
    );
    assert_eq!(customers[2].entity_id, "Initech");
}

#[test]
fn test_null_totals_on_failure_raise_status_failure() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchResult": {
                    "status": {
                        "isSuccess": false,
                        "statusDetail": [{
                            "code": "ABORT_SEARCH_EXCEEDED_MAX_TIME",
                            "message": "Search took too long",
                            "type": "ERROR"
                        }]
                    },
                    "totalRecords": null,
                    "pageSize": null,
                    "totalPages": null,
                    "pageIndex": null,
                    "searchId": null,
                    "recordList": null
                }
            })))
            .mount(&server),
    );

    let service: SearchService<Value> = service_for(&server);
    let envelope = service.execute_search(&json!({})).unwrap();
    assert!(!envelope.status.is_success);
    assert_eq!(envelope.total_records, 0);
    assert_eq!(envelope.total_pages, 0);
    assert_eq!(envelope.records, None);

    let mut cursor = SearchCursor::new(&service, json!({}));
    let err = cursor.current().unwrap_err();
    assert!(err.is_status_failure());
    assert!(err
        .as_status_failure()
        .unwrap()
        .contains_code("ABORT_SEARCH_EXCEEDED_MAX_TIME"));
    assert_eq!(cursor.phase(), CursorPhase::Failed);
}
