//! RPC surface tests.
//!
//! Drive the full router over in-memory gateways and check the response
//! envelopes.

mod common;

use std::collections::HashSet;

use axum::http::{HeaderValue, StatusCode, header};
use serde_json::{Value, json};

use common::*;

// ============================================================================
// Write RPCs
// ============================================================================

#[tokio::test]
async fn test_save_assigns_id_and_label() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/businessLog/save")
        .add_header(
            header::REFERER,
            HeaderValue::from_static("http://crm.example.com/orders/100"),
        )
        .json(&business_log("CRM", "add", 1))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "200");
    assert_eq!(body["success"], true);
    let id = body["data"].as_i64().expect("id in data");

    let list: Value = app.server.post("/api/businessLog/list").await.json();
    let records = list["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id);
    assert_eq!(records[0]["operationTypeText"], "Create");
    assert!(records[0]["createTime"].is_string());
}

#[tokio::test]
async fn test_save_without_referer() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/businessLog/save")
        .json(&business_log("CRM", "edit", 1))
        .await;

    response.assert_status_ok();
    assert_eq!(app.business.len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_failed_envelope() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/businessLog/save")
        .text("{ not json")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "5000");
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert!(app.business.is_empty());
}

#[tokio::test]
async fn test_batch_save_returns_ids_in_order() {
    let app = create_test_app();
    let logs = vec![
        business_log("CRM", "add", 1),
        business_log("CRM", "edit", 2),
        business_log("ERP", "del", 3),
    ];

    let body: Value = app
        .server
        .post("/api/businessLog/batchSave")
        .json(&logs)
        .await
        .json();

    assert_eq!(body["success"], true);
    let ids: HashSet<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(app.business.len(), 3);
}

#[tokio::test]
async fn test_empty_batch_is_accepted() {
    let app = create_test_app();

    let body: Value = app
        .server
        .post("/api/businessLog/batchSave")
        .json(&json!([]))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_delete_all() {
    let app = create_test_app();
    app.server
        .post("/api/businessLog/batchSave")
        .json(&dated_business_logs(5))
        .await
        .assert_status_ok();

    let body: Value = app.server.post("/api/businessLog/deleteAll").await.json();

    assert_eq!(body["success"], true);
    assert!(app.business.is_empty());
}

// ============================================================================
// Read RPCs
// ============================================================================

async fn seeded_app(count: usize) -> TestApp {
    let app = create_test_app();
    app.server
        .post("/api/businessLog/batchSave")
        .json(&dated_business_logs(count))
        .await
        .assert_status_ok();
    app
}

#[tokio::test]
async fn test_list_page_explicit_page() {
    let app = seeded_app(25).await;

    let body: Value = app
        .server
        .post("/api/businessLog/listPage")
        .json(&json!({ "page": 2, "rows": 10 }))
        .await
        .json();

    assert_eq!(body["code"], "200");
    assert_eq!(body["pageNum"], 2);
    assert_eq!(body["total"], 25);
    assert_eq!(body["pages"], 3);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    // Newest first: page 1 holds 24..=15
    assert_eq!(data[0]["businessId"], 14);
    assert_eq!(data[9]["businessId"], 5);
}

#[tokio::test]
async fn test_list_page_without_page_spans_fetches() {
    let app = seeded_app(25).await;

    let body: Value = app
        .server
        .post("/api/businessLog/listPage")
        .json(&json!({ "rows": 25 }))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 25);
    assert_eq!(body["total"], 25);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["pageNum"], 3);
    assert_eq!(app.business.open_scrolls(), 0);
}

#[tokio::test]
async fn test_list_page_oversized_explicit_page_fails() {
    let app = seeded_app(5).await;

    let response = app
        .server
        .post("/api/businessLog/listPage")
        .json(&json!({ "page": 1, "rows": 25 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "5000");
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("page size too large")
    );
}

#[tokio::test]
async fn test_list_page_no_match() {
    let app = seeded_app(5).await;

    let body: Value = app
        .server
        .post("/api/businessLog/listPage")
        .json(&json!({ "systemCode": "NONE", "page": 1, "rows": 10 }))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_without_body_returns_everything() {
    let app = seeded_app(23).await;

    let body: Value = app.server.post("/api/businessLog/list").await.json();

    assert_eq!(body["data"].as_array().unwrap().len(), 23);
    assert_eq!(app.business.open_scrolls(), 0);
}

#[tokio::test]
async fn test_list_honors_rows() {
    let app = seeded_app(23).await;

    let body: Value = app
        .server
        .post("/api/businessLog/list")
        .json(&json!({ "rows": 5 }))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert!(body.get("pageNum").is_none());
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["businessId"].as_i64())
        .collect();
    assert_eq!(ids, vec![22, 21, 20, 19, 18]);
}

#[tokio::test]
async fn test_list_explicit_page() {
    let app = seeded_app(23).await;

    let body: Value = app
        .server
        .post("/api/businessLog/list")
        .json(&json!({ "page": 3, "rows": 10 }))
        .await
        .json();

    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_filters() {
    let app = create_test_app();
    let logs: Vec<Value> = [1, 2, 3, 2]
        .iter()
        .map(|market| business_log("CRM", "add", *market))
        .collect();
    app.server
        .post("/api/businessLog/batchSave")
        .json(&logs)
        .await
        .assert_status_ok();

    let body: Value = app
        .server
        .post("/api/businessLog/list")
        .json(&json!({ "marketIdSet": [1, 3] }))
        .await
        .json();

    let mut markets: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["marketId"].as_i64())
        .collect();
    markets.sort();
    assert_eq!(markets, vec![1, 3]);
}

#[tokio::test]
async fn test_list_time_range() {
    let app = seeded_app(10).await;

    let body: Value = app
        .server
        .post("/api/businessLog/list")
        .json(&json!({
            "createTimeStart": "2024-01-01T00:00:03Z",
            "createTimeEnd": "2024-01-01T00:00:05Z"
        }))
        .await
        .json();

    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["businessId"].as_i64())
        .collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

// ============================================================================
// Customer account logs
// ============================================================================

#[tokio::test]
async fn test_account_logs_are_separate() {
    let app = create_test_app();

    app.server
        .post("/api/customerAccountLog/save")
        .json(&account_log(1_500))
        .await
        .assert_status_ok();

    let accounts: Value = app.server.post("/api/customerAccountLog/list").await.json();
    let data = accounts["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["amount"], 1_500);
    assert_eq!(data[0]["fundItemName"], "deposit");
    assert_eq!(data[0]["operationTypeText"], "Create");

    assert_eq!(app.accounts.len(), 1);
    assert!(app.business.is_empty());
}

// ============================================================================
// Health and failures
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_backend_failure_is_500_envelope() {
    let server = create_failing_app();

    let response = server
        .post("/api/businessLog/save")
        .json(&business_log("CRM", "add", 1))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "5000");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_search_failure_is_500_envelope() {
    let server = create_failing_app();

    let response = server
        .post("/api/customerAccountLog/listPage")
        .json(&json!({ "page": 1, "rows": 10 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("unavailable"));
}
