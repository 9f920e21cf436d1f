//--------------------------------------------------------------------------------------------------
// Benchmarks the matching loop under sustained order flow (SPEC_FULL.md §8), matching the source's
// `matching_engine_bench` naming.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;
use uuid::Uuid;

use ultimate_matching::domain::services::backend::memory::InMemoryBackend;
use ultimate_matching::{Decimal, LoggingSink, Order, OrderBook, OrderStatus, OrderType, Side, TimeInForce};

fn resting_order(side: Side, price: i64, qty: i64) -> Order {
    Order {
        id: Uuid::new_v4(),
        instrument_id: Uuid::new_v4(),
        side,
        order_type: OrderType::Limit,
        tif: TimeInForce::GTC,
        quantity: Decimal::from_i64(qty),
        original_quantity: Decimal::from_i64(qty),
        price: Decimal::from_i64(price),
        stop_price: None,
        oco_id: None,
        created_at: Utc::now(),
        user_tag: String::new(),
        status: OrderStatus::Pending,
    }
}

fn bench_sustained_crossing_flow(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");

    c.bench_function("process_1000_crossing_orders", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut book = OrderBook::new(
                    "BENCH",
                    Arc::new(InMemoryBackend::new()),
                    Box::new(LoggingSink),
                );
                for i in 0..1000i64 {
                    let price = 100 + (i % 10);
                    book.process(resting_order(Side::Sell, price, 1))
                        .await
                        .expect("resting leg accepted");
                    let taker = resting_order(Side::Buy, price, 1);
                    let done = book.process(black_box(taker)).await.expect("taker accepted");
                    black_box(done);
                }
            })
        })
    });
}

criterion_group!(benches, bench_sustained_crossing_flow);
criterion_main!(benches);
