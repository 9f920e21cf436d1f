//--------------------------------------------------------------------------------------------------
// Integration test for the thin HTTP adapter (SPEC_FULL.md §6): create a book, submit a resting
// order, read it back through the surface exactly as an external client would.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use ultimate_matching::api::{router, AppState};
use ultimate_matching::{LoggingSinkFactory, Registry};

fn server() -> TestServer {
    let registry = Registry::new(Arc::new(LoggingSinkFactory));
    let state = Arc::new(AppState { registry });
    TestServer::new(router(state)).expect("test server")
}

#[tokio::test]
async fn create_book_then_order_then_read_it_back() {
    let server = server();

    server
        .post("/books")
        .json(&json!({ "backend": "memory", "name": "BTCUSD" }))
        .await
        .assert_status_ok();

    let instrument_id = Uuid::new_v4();
    let create_order = server
        .post("/books/BTCUSD/orders")
        .json(&json!({
            "instrument_id": instrument_id,
            "side": "BUY",
            "order_type": "LIMIT",
            "tif": "GTC",
            "quantity": "10.000",
            "price": "95.000",
        }))
        .await;
    create_order.assert_status_ok();
    let done: serde_json::Value = create_order.json();
    assert_eq!(done["status"], "Open");
    assert_eq!(done["stored"], true);

    let state = server.get("/books/BTCUSD/state").await;
    state.assert_status_ok();
    let depth: serde_json::Value = state.json();
    assert_eq!(depth["bids"][0]["price"], "95.000");
}

#[tokio::test]
async fn creating_the_same_book_twice_conflicts() {
    let server = server();
    server
        .post("/books")
        .json(&json!({ "backend": "memory", "name": "DUP" }))
        .await
        .assert_status_ok();
    let second = server
        .post("/books")
        .json(&json!({ "backend": "memory", "name": "DUP" }))
        .await;
    second.assert_status_conflict();
}

#[tokio::test]
async fn unknown_book_returns_not_found() {
    let server = server();
    let resp = server.get("/books/MISSING/state").await;
    resp.assert_status_not_found();
}
