//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core order entity and the enums that describe its side, type, time-in-force, and lifecycle
// status. Prices and quantities are carried as `Decimal`; no binary floating point appears here.
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decimal::Decimal;

/// Side of an order (or of a resting price level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Type of an order. Immutable for the life of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

impl OrderType {
    pub fn is_stop_family(&self) -> bool {
        matches!(self, OrderType::Stop | OrderType::StopLimit)
    }
}

/// Time-in-force policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-till-canceled: the default, and the only legal value for resting limit orders.
    GTC,
    /// Immediate-or-cancel: any unfilled remainder is discarded.
    IOC,
    /// Fill-or-kill: executes fully at entry or is entirely rejected.
    FOK,
}

impl Default for TimeInForce {
    fn default() -> Self {
        Self::GTC
    }
}

/// Lifecycle status of an order (see SPEC_FULL.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Resting in the stop book, waiting for activation.
    Pending,
    /// Resting in a side container.
    Open,
    /// Fully matched.
    Filled,
    /// Removed without fully matching (IOC remainder, FOK rejection, explicit cancel, OCO).
    Canceled,
}

/// A trading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub instrument_id: Uuid,
    pub side: Side,
    pub order_type: OrderType,
    pub tif: TimeInForce,
    /// Remaining quantity; mutated during matching.
    pub quantity: Decimal,
    /// Snapshot of quantity at creation; never mutated.
    pub original_quantity: Decimal,
    /// Limit price for Limit and StopLimit orders; unused for Market and Stop.
    pub price: Decimal,
    /// Trigger price for Stop and StopLimit orders.
    pub stop_price: Option<Decimal>,
    /// Optional one-cancels-the-other partner.
    pub oco_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub user_tag: String,
    pub status: OrderStatus,
}

impl Order {
    /// Converts a resting Stop/StopLimit order into the order it becomes once activated:
    /// StopLimit -> Limit at its own price; Stop -> Market. Per SPEC_FULL.md §4.5.
    pub fn into_activated(mut self) -> Order {
        self.order_type = match self.order_type {
            OrderType::StopLimit => OrderType::Limit,
            OrderType::Stop => OrderType::Market,
            other => other,
        };
        self.stop_price = None;
        self
    }

    pub fn is_fully_filled(&self) -> bool {
        self.quantity.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(order_type: OrderType, tif: TimeInForce) -> Order {
        Order {
            id: Uuid::new_v4(),
            instrument_id: Uuid::new_v4(),
            side: Side::Buy,
            order_type,
            tif,
            quantity: Decimal::from_i64(10),
            original_quantity: Decimal::from_i64(10),
            price: Decimal::from_i64(95),
            stop_price: None,
            oco_id: None,
            created_at: Utc::now(),
            user_tag: "trader-1".to_string(),
            status: OrderStatus::Open,
        }
    }

    #[test]
    fn opposite_side_round_trips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn stop_limit_activates_into_limit_at_its_own_price() {
        let mut order = sample_order(OrderType::StopLimit, TimeInForce::GTC);
        order.stop_price = Some(Decimal::from_i64(105));
        let activated = order.into_activated();
        assert_eq!(activated.order_type, OrderType::Limit);
        assert_eq!(activated.price, Decimal::from_i64(95));
        assert_eq!(activated.stop_price, None);
    }

    #[test]
    fn stop_activates_into_market() {
        let mut order = sample_order(OrderType::Stop, TimeInForce::GTC);
        order.stop_price = Some(Decimal::from_i64(105));
        let activated = order.into_activated();
        assert_eq!(activated.order_type, OrderType::Market);
    }
}
