//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The structured per-process event: a taker summary plus an ordered sequence of trade legs,
// emitted exactly once per accepted order that reaches matching (SPEC_FULL.md §3, §6).
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decimal::Decimal;

/// A participant's role in a single trade leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Taker,
    Maker,
}

/// One leg of a trade: the taker leg (always first) or one maker leg per fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLeg {
    pub order_id: Uuid,
    pub role: Role,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// The structured event emitted once per accepted order that went through matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Done {
    pub order_id: Uuid,
    pub quantity: Decimal,
    pub executed: Decimal,
    pub remaining: Decimal,
    pub stored: bool,
    pub canceled: Vec<Uuid>,
    pub activated: Vec<Uuid>,
    /// First element describes the taker; subsequent elements are one per matched maker.
    pub trades: Vec<TradeLeg>,
}

impl Done {
    /// A done record for an order that was accepted into the stop book untouched.
    pub fn pending(order_id: Uuid, original_quantity: Decimal, price: Decimal) -> Self {
        Done {
            order_id,
            quantity: original_quantity,
            executed: Decimal::ZERO,
            remaining: original_quantity,
            stored: true,
            canceled: Vec::new(),
            activated: Vec::new(),
            trades: vec![TradeLeg {
                order_id,
                role: Role::Taker,
                quantity: original_quantity,
                price,
            }],
        }
    }
}

/// The wire shape §6 specifies for the event sink: fixed-point decimal strings, and
/// `processed`/`left` duplicated alongside `executed_qty`/`remaining_qty` for naming parity
/// with external consumers that expect either vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoneWire {
    pub order_id: String,
    pub executed_qty: String,
    pub remaining_qty: String,
    pub canceled: Vec<String>,
    pub activated: Vec<String>,
    pub stored: bool,
    pub quantity: String,
    pub processed: String,
    pub left: String,
    pub trades: Vec<TradeLegWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLegWire {
    pub order_id: String,
    pub role: String,
    pub quantity: String,
    pub price: String,
}

impl From<&Done> for DoneWire {
    fn from(done: &Done) -> Self {
        DoneWire {
            order_id: done.order_id.to_string(),
            executed_qty: done.executed.to_string(),
            remaining_qty: done.remaining.to_string(),
            canceled: done.canceled.iter().map(Uuid::to_string).collect(),
            activated: done.activated.iter().map(Uuid::to_string).collect(),
            stored: done.stored,
            quantity: done.quantity.to_string(),
            processed: done.executed.to_string(),
            left: done.remaining.to_string(),
            trades: done
                .trades
                .iter()
                .map(|leg| TradeLegWire {
                    order_id: leg.order_id.to_string(),
                    role: match leg.role {
                        Role::Taker => "TAKER".to_string(),
                        Role::Maker => "MAKER".to_string(),
                    },
                    quantity: leg.quantity.to_string(),
                    price: leg.price.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_done_carries_a_single_taker_leg() {
        let id = Uuid::new_v4();
        let done = Done::pending(id, Decimal::from_i64(10), Decimal::from_i64(105));
        assert!(done.stored);
        assert_eq!(done.executed, Decimal::ZERO);
        assert_eq!(done.trades.len(), 1);
        assert_eq!(done.trades[0].role, Role::Taker);
    }

    #[test]
    fn wire_shape_formats_decimals_with_three_digits() {
        let id = Uuid::new_v4();
        let done = Done::pending(id, Decimal::from_i64(10), Decimal::from_i64(105));
        let wire = DoneWire::from(&done);
        assert_eq!(wire.quantity, "10.000");
        assert_eq!(wire.executed_qty, "0.000");
        assert_eq!(wire.trades[0].role, "TAKER");
    }
}
