//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// An ordered sequence of orders sharing a single price, in arrival order. O(1) append at tail,
// O(1) dequeue from head; `remove` by id is O(k) in level length. No reordering ever occurs
// within a level (SPEC_FULL.md §4.1).
//--------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use uuid::Uuid;

use crate::domain::models::Order;

#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    pub fn append(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Removes the order with the given id, preserving arrival order of the rest.
    pub fn remove(&mut self, order_id: Uuid) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == order_id)?;
        self.orders.remove(pos)
    }

    /// Returns the earliest-arriving order without removing it.
    pub fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the head order, for in-place quantity decrements.
    pub fn head_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Removes and returns the head order.
    pub fn pop_head(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    pub fn total_quantity(&self) -> crate::domain::models::Decimal {
        self.orders
            .iter()
            .fold(crate::domain::models::Decimal::ZERO, |acc, o| {
                acc.checked_add(o.quantity).unwrap_or(acc)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Decimal, OrderStatus, OrderType, Side, TimeInForce};
    use chrono::Utc;

    fn order_with_qty(qty: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            instrument_id: Uuid::new_v4(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            tif: TimeInForce::GTC,
            quantity: Decimal::from_i64(qty),
            original_quantity: Decimal::from_i64(qty),
            price: Decimal::from_i64(100),
            stop_price: None,
            oco_id: None,
            created_at: Utc::now(),
            user_tag: String::new(),
            status: OrderStatus::Open,
        }
    }

    #[test]
    fn append_preserves_arrival_order() {
        let mut level = PriceLevel::new();
        let first = order_with_qty(1);
        let second = order_with_qty(2);
        let first_id = first.id;
        level.append(first);
        level.append(second);
        let head = match level.head() {
            Some(o) => o,
            None => panic!("expected a head order"),
        };
        assert_eq!(head.id, first_id);
    }

    #[test]
    fn remove_by_id_preserves_order_of_the_rest() {
        let mut level = PriceLevel::new();
        let a = order_with_qty(1);
        let b = order_with_qty(2);
        let c = order_with_qty(3);
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        level.append(a);
        level.append(b);
        level.append(c);

        let removed = level.remove(b_id);
        assert!(removed.is_some());
        let remaining: Vec<Uuid> = level.iter().map(|o| o.id).collect();
        assert_eq!(remaining, vec![a_id, c_id]);
    }

    #[test]
    fn pop_head_drains_in_fifo_order() {
        let mut level = PriceLevel::new();
        let a = order_with_qty(1);
        let b = order_with_qty(2);
        let (a_id, b_id) = (a.id, b.id);
        level.append(a);
        level.append(b);

        let first = match level.pop_head() {
            Some(o) => o,
            None => panic!("expected an order"),
        };
        assert_eq!(first.id, a_id);
        let second = match level.pop_head() {
            Some(o) => o,
            None => panic!("expected an order"),
        };
        assert_eq!(second.id, b_id);
        assert!(level.is_empty());
    }
}
