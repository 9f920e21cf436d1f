//--------------------------------------------------------------------------------------------------
// Minimal demo client (SPEC_FULL.md §6 "Market-maker client"): submits a handful of orders
// against a running book over the HTTP adapter, purely to exercise the surface end to end. Not a
// trading strategy; grounded on the source's `bin/market_maker.rs` in spirit (an ordinary HTTP
// caller), rewritten against this core's leaner request shape.
//--------------------------------------------------------------------------------------------------

use serde_json::json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let base = std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let client = reqwest::Client::new();
    let book_name = "DEMO";
    let instrument_id = Uuid::new_v4();

    client
        .post(format!("{base}/books"))
        .json(&json!({ "backend": "memory", "name": book_name }))
        .send()
        .await?;

    let asks = [("100.000", "5.000"), ("101.000", "3.000")];
    for (price, quantity) in asks {
        let resp = client
            .post(format!("{base}/books/{book_name}/orders"))
            .json(&json!({
                "instrument_id": instrument_id,
                "side": "SELL",
                "order_type": "LIMIT",
                "tif": "GTC",
                "quantity": quantity,
                "price": price,
            }))
            .send()
            .await?;
        println!("resting ask {price}@{quantity}: {}", resp.status());
    }

    let resp = client
        .post(format!("{base}/books/{book_name}/orders"))
        .json(&json!({
            "instrument_id": instrument_id,
            "side": "BUY",
            "order_type": "LIMIT",
            "tif": "GTC",
            "quantity": "4.000",
            "price": "101.000",
        }))
        .send()
        .await?;
    println!("crossing buy done record: {}", resp.text().await?);

    let state = client
        .get(format!("{base}/books/{book_name}/state"))
        .send()
        .await?
        .text()
        .await?;
    println!("book state: {state}");

    Ok(())
}
