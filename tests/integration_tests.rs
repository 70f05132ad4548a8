//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → search service → cursor →
//! records and typed failures

use clap::Parser;
use paged_search::cli::{Cli, Runner};
use paged_search::status::codes;
use paged_search::{
    ClientConfig, CursorPhase, Error, SearchCursor, SearchService, TemplateContext,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn mock_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn page(page_index: u32, total_pages: u32, total_records: u64, ids: &[u64]) -> Value {
    let records: Vec<Value> = ids.iter().map(|id| json!({"internalId": id})).collect();
    json!({
        "searchResult": {
            "status": {"isSuccess": true, "statusDetail": []},
            "totalRecords": total_records,
            "pageSize": 2,
            "totalPages": total_pages,
            "pageIndex": page_index,
            "searchId": "WEBSERVICES_TSTDRV1_abc",
            "recordList": {"record": records}
        }
    })
}

fn failed(code: &str, message: &str) -> Value {
    json!({
        "searchResult": {
            "status": {
                "isSuccess": false,
                "statusDetail": [{"code": code, "message": message, "type": "ERROR"}]
            }
        }
    })
}

/// Three pages of two, two and one records, behind bearer auth
///
/// With `all_pages` the follow-up pages must each be requested exactly once.
fn mount_three_pages(rt: &Runtime, server: &MockServer, all_pages: bool) {
    let follow_up_calls = if all_pages { 1..=1 } else { 0..=1 };
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tok_live"))
            .and(body_partial_json(json!({"searchPreferences": {"pageSize": 2}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 3, 5, &[1, 2])))
            .expect(1)
            .mount(server)
            .await;

        for (index, ids) in [(2u32, vec![3u64, 4]), (3, vec![5])] {
            Mock::given(method("POST"))
                .and(path("/searchMoreWithId"))
                .and(body_partial_json(json!({
                    "searchId": "WEBSERVICES_TSTDRV1_abc",
                    "pageIndex": index
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(index, 3, 5, &ids)))
                .expect(follow_up_calls.clone())
                .mount(server)
                .await;
        }
    });
}

fn config_yaml(server: &MockServer) -> String {
    format!(
        r#"
base_url: "{}"
auth:
  type: bearer
  token: "{{{{ vars.token }}}}"
http:
  max_retries: 0
search:
  page_size: 2
"#,
        server.uri()
    )
}

fn client_config(server: &MockServer) -> ClientConfig {
    let mut ctx = TemplateContext::new();
    ctx.insert_var("token", "tok_live");
    ClientConfig::from_yaml(&config_yaml(server), &ctx).unwrap()
}

fn ids(records: &[Value]) -> Vec<u64> {
    records
        .iter()
        .map(|r| r["internalId"].as_u64().unwrap())
        .collect()
}

// ============================================================================
// Cursor over the HTTP executor
// ============================================================================

#[test]
fn test_cursor_walks_every_page() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount_three_pages(&rt, &server, true);

    let service: SearchService<Value> = SearchService::new(&client_config(&server)).unwrap();
    let cursor = SearchCursor::with_page_size(&service, json!({"type": "customer"}), 2).unwrap();

    let records: Vec<Value> = cursor.collect::<paged_search::Result<_>>().unwrap();
    assert_eq!(ids(&records), vec![1, 2, 3, 4, 5]);
    assert_eq!(service.preferences(), None);

    rt.block_on(server.verify());
}

#[test]
fn test_count_fetches_only_first_page() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount_three_pages(&rt, &server, false);

    let service: SearchService<Value> = SearchService::new(&client_config(&server)).unwrap();
    let mut cursor =
        SearchCursor::with_page_size(&service, json!({"type": "customer"}), 2).unwrap();

    assert_eq!(cursor.total_records().unwrap(), 5);
    assert_eq!(cursor.phase(), CursorPhase::HasMore);
    assert_eq!(cursor.total_pages(), 3);

    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
}

#[test]
fn test_status_failure_mid_iteration() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 2, 4, &[1, 2])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/searchMoreWithId"))
            .respond_with(ResponseTemplate::new(200).set_body_json(failed(
                codes::INVALID_KEY_OR_REF,
                "The search session has expired",
            )))
            .expect(1)
            .mount(&server)
            .await;
    });

    let service: SearchService<Value> = SearchService::new(&client_config(&server)).unwrap();
    let mut cursor = SearchCursor::with_page_size(&service, json!({}), 2).unwrap();

    assert_eq!(cursor.current().unwrap().unwrap()["internalId"], 1);
    cursor.advance().unwrap();
    let err = cursor.advance().unwrap_err();

    let failure = err.as_status_failure().unwrap();
    assert!(failure.contains_code(codes::INVALID_KEY_OR_REF));
    assert_eq!(
        failure
            .find_detail_by_code(codes::INVALID_KEY_OR_REF)
            .unwrap()
            .message,
        "The search session has expired"
    );
    assert!(err.to_string().contains("INVALID_KEY_OR_REF"));

    assert_eq!(cursor.phase(), CursorPhase::Failed);
    assert!(!cursor.is_valid().unwrap());
    assert_eq!(ids(cursor.buffered()), vec![1, 2]);
    assert_eq!(service.preferences(), None);

    rt.block_on(server.verify());
}

#[test]
fn test_initial_status_failure() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(failed(
                codes::INSUFFICIENT_PERMISSION,
                "Permission Violation: you need the Lists > Customers permission",
            )))
            .mount(&server),
    );

    let service: SearchService<Value> = SearchService::new(&client_config(&server)).unwrap();
    let mut cursor = SearchCursor::new(&service, json!({}));

    let err = cursor.total_records().unwrap_err();
    assert!(err.is_status_failure());
    assert_eq!(cursor.total_records().unwrap(), 0);
}

#[test]
fn test_transport_error_is_not_translated() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid login"))
            .mount(&server),
    );

    let service: SearchService<Value> = SearchService::new(&client_config(&server)).unwrap();
    let mut cursor = SearchCursor::new(&service, json!({}));

    let err = cursor.current().unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
    assert!(!err.is_status_failure());
}

// ============================================================================
// CLI
// ============================================================================

fn write_config(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config_yaml(server).as_bytes()).unwrap();
    file
}

fn run_cli(args: &[&str]) -> (paged_search::Result<()>, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let result = Runner::new(cli).run_to(&mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_cli_search_prints_one_record_per_line() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount_three_pages(&rt, &server, true);
    let config = write_config(&server);
    let config_path = config.path().to_str().unwrap();

    let (result, out) = run_cli(&[
        "paged-search",
        "-c",
        config_path,
        "--var",
        "token=tok_live",
        "search",
        "--criteria-json",
        r#"{"type":"customer"}"#,
    ]);

    result.unwrap();
    let lines: Vec<Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(ids(&lines), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_cli_search_max_records_stops_paging() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount_three_pages(&rt, &server, false);
    let config = write_config(&server);
    let config_path = config.path().to_str().unwrap();

    let (result, out) = run_cli(&[
        "paged-search",
        "-c",
        config_path,
        "--var",
        "token=tok_live",
        "search",
        "--criteria-json",
        "{}",
        "--max-records",
        "2",
    ]);

    result.unwrap();
    assert_eq!(out.lines().count(), 2);
    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
}

#[test]
fn test_cli_count_and_validate() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount_three_pages(&rt, &server, false);
    let config = write_config(&server);
    let config_path = config.path().to_str().unwrap();

    let (result, out) = run_cli(&[
        "paged-search",
        "-c",
        config_path,
        "--var",
        "token=tok_live",
        "count",
        "--criteria-json",
        "{}",
    ]);
    result.unwrap();
    assert_eq!(out.trim(), "5");

    let (result, out) = run_cli(&[
        "paged-search",
        "-c",
        config_path,
        "--var",
        "token=tok_live",
        "validate",
    ]);
    result.unwrap();
    assert_eq!(out.trim(), "OK");
}

#[test]
fn test_cli_validate_reports_undefined_variable() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    let config = write_config(&server);
    let config_path = config.path().to_str().unwrap();

    let (result, _) = run_cli(&["paged-search", "-c", config_path, "validate"]);
    assert!(matches!(result, Err(Error::UndefinedVariable { .. })));
}
