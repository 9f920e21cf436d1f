//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Route handlers. Grounded on the source's `api/routes.rs` (axum extractors, `Extension<AppState>`
// pattern), narrowed to the core surface SPEC_FULL.md §6 names: no fee/settlement/auth endpoints.
//--------------------------------------------------------------------------------------------------

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::models::{Decimal, Order, OrderStatus};
use crate::domain::services::backend::remote::RemoteBackendOptions;
use crate::domain::services::Registry;

use super::dto::{
    status_label, BookListResponse, BookResponse, CreateBookRequest, CreateOrderRequest,
    DepthResponse, DoneResponse, ListBooksQuery, OrderResponse,
};
use super::error::ApiError;

pub struct AppState {
    pub registry: Registry,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn create_book(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let name = match req {
        CreateBookRequest::Memory { name } => {
            state.registry.create_memory_book(name.clone()).await?;
            name
        }
        CreateBookRequest::Remote {
            name,
            addr,
            password,
            db,
            prefix,
        } => {
            let options = RemoteBackendOptions {
                addr,
                password,
                db: db.unwrap_or(0),
                prefix,
            };
            state
                .registry
                .create_remote_book(name.clone(), options)
                .await?;
            name
        }
    };
    Ok(Json(BookResponse { name }))
}

pub async fn list_books(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
) -> Json<BookListResponse> {
    Json(BookListResponse {
        books: state.registry.list_books(query.limit, query.offset).await,
    })
}

pub async fn delete_book(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<(), ApiError> {
    state.registry.delete_book(&name).await?;
    Ok(())
}

pub async fn get_book_state(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<DepthResponse>, ApiError> {
    let book = state.registry.get_book(&name).await?;
    let book = book.read().await;
    let bids = book.get_bids().await?;
    let asks = book.get_asks().await?;
    let last_trade_price = book.last_trade_price().map(|p| p.to_string());
    Ok(Json(DepthResponse::new(bids, asks, last_trade_price)))
}

fn parse_decimal(label: &str, raw: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(raw).map_err(|e| ApiError::InvalidArgument(format!("{label}: {e}")))
}

pub async fn create_order(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<DoneResponse>, ApiError> {
    let book = state.registry.get_book(&name).await?;

    let quantity = parse_decimal("quantity", &req.quantity)?;
    let price = match &req.price {
        Some(p) => parse_decimal("price", p)?,
        None => Decimal::ZERO,
    };
    let stop_price = match &req.stop_price {
        Some(p) => Some(parse_decimal("stop_price", p)?),
        None => None,
    };

    let order = Order {
        id: Uuid::new_v4(),
        instrument_id: req.instrument_id,
        side: req.side,
        order_type: req.order_type,
        tif: req.tif,
        quantity,
        original_quantity: quantity,
        price,
        stop_price,
        oco_id: req.oco_id,
        created_at: Utc::now(),
        user_tag: req.user_tag,
        status: OrderStatus::Pending,
    };
    let order_type = order.order_type;

    let mut book = book.write().await;
    let done = book.process(order).await?;

    let status = status_label(order_type, done.executed.is_zero(), done.remaining.is_zero(), done.stored);
    Ok(Json(DoneResponse {
        status,
        done: (&done).into(),
    }))
}

pub async fn get_order(
    Extension(state): Extension<Arc<AppState>>,
    Path((name, id)): Path<(String, Uuid)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let book = state.registry.get_book(&name).await?;
    let book = book.read().await;
    let order = book
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id}")))?;
    Ok(Json(order.into()))
}

pub async fn cancel_order(
    Extension(state): Extension<Arc<AppState>>,
    Path((name, id)): Path<(String, Uuid)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let book = state.registry.get_book(&name).await?;
    let book = book.read().await;
    let order = book
        .cancel(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id}")))?;
    Ok(Json(order.into()))
}

