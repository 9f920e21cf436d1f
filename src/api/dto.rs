//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Request/response shapes for the thin HTTP adapter (SPEC_FULL.md §6). Grounded on the source's
// `api/dto.rs`, trimmed to the fields this core actually carries (no account/fee/settlement
// fields, which are out of scope).
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::{DoneWire, Order, OrderStatus, OrderType, Side, TimeInForce};
use crate::domain::services::SideDepth;

#[derive(Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum CreateBookRequest {
    Memory { name: String },
    Remote {
        name: String,
        addr: String,
        password: Option<String>,
        db: Option<u32>,
        prefix: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct PriceLevelResponse {
    pub price: String,
    pub quantity: String,
    pub order_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DepthResponse {
    pub bids: Vec<PriceLevelResponse>,
    pub asks: Vec<PriceLevelResponse>,
    pub last_trade_price: Option<String>,
}

impl DepthResponse {
    pub fn new(bids: SideDepth, asks: SideDepth, last_trade_price: Option<String>) -> Self {
        let to_levels = |levels: SideDepth| {
            levels
                .into_iter()
                .map(|(price, quantity, order_count)| PriceLevelResponse {
                    price: price.to_string(),
                    quantity: quantity.to_string(),
                    order_count,
                })
                .collect()
        };
        DepthResponse {
            bids: to_levels(bids),
            asks: to_levels(asks),
            last_trade_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub instrument_id: Uuid,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(default)]
    pub tif: TimeInForce,
    pub quantity: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub stop_price: Option<String>,
    #[serde(default)]
    pub oco_id: Option<Uuid>,
    #[serde(default)]
    pub user_tag: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub instrument_id: Uuid,
    pub side: Side,
    pub order_type: OrderType,
    pub tif: TimeInForce,
    pub quantity: String,
    pub original_quantity: String,
    pub price: String,
    pub stop_price: Option<String>,
    pub status: OrderStatus,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            instrument_id: order.instrument_id,
            side: order.side,
            order_type: order.order_type,
            tif: order.tif,
            quantity: order.quantity.to_string(),
            original_quantity: order.original_quantity.to_string(),
            price: order.price.to_string(),
            stop_price: order.stop_price.map(|p| p.to_string()),
            status: order.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoneResponse {
    /// `Filled` | `PartiallyFilled` | `Open` | `Canceled` | `Pending`, derived from the done
    /// record's `executed`/`remaining`/`stored` fields. The core itself reports only the
    /// numeric outcome (§9); this adapter derives the human label.
    pub status: &'static str,
    #[serde(flatten)]
    pub done: DoneWire,
}

pub fn status_label(
    order_type: OrderType,
    executed_is_zero: bool,
    remaining_is_zero: bool,
    stored: bool,
) -> &'static str {
    if stored {
        if order_type.is_stop_family() {
            "Pending"
        } else if executed_is_zero {
            "Open"
        } else {
            "PartiallyFilled"
        }
    } else if remaining_is_zero {
        "Filled"
    } else if executed_is_zero {
        "Canceled"
    } else {
        "PartiallyFilled"
    }
}
