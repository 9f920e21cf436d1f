//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Two price-keyed collections holding Stop and StopLimit orders that have not yet activated.
// Buy stops are keyed so the least-priced stop pops first; sell stops so the greatest-priced
// stop pops first. This ordering is what lets activation (SPEC_FULL.md §4.5) pop in the correct
// monotonic direction without scanning.
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::models::{Decimal, Order, Side};

#[derive(Debug, Clone, Default)]
pub struct StopBook {
    buy_stops: BTreeMap<Decimal, Vec<Order>>,
    sell_stops: BTreeMap<Decimal, Vec<Order>>,
}

impl StopBook {
    pub fn new() -> Self {
        Self {
            buy_stops: BTreeMap::new(),
            sell_stops: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, order: Order) {
        let stop_price = order
            .stop_price
            .expect("stop orders always carry a stop_price by the time they reach the stop book");
        let book = match order.side {
            Side::Buy => &mut self.buy_stops,
            Side::Sell => &mut self.sell_stops,
        };
        book.entry(stop_price).or_default().push(order);
    }

    pub fn remove(&mut self, side: Side, stop_price: Decimal, order_id: Uuid) -> Option<Order> {
        let book = match side {
            Side::Buy => &mut self.buy_stops,
            Side::Sell => &mut self.sell_stops,
        };
        let bucket = book.get_mut(&stop_price)?;
        let pos = bucket.iter().position(|o| o.id == order_id)?;
        let removed = bucket.remove(pos);
        if bucket.is_empty() {
            book.remove(&stop_price);
        }
        Some(removed)
    }

    /// Pops every sell stop with `stop_price >= last_trade_price`, in descending stop-price
    /// order (the worst, furthest-triggered stops first).
    pub fn pop_triggered_sell_stops(&mut self, last_trade_price: Decimal) -> Vec<Order> {
        let mut triggered = Vec::new();
        let keys: Vec<Decimal> = self
            .sell_stops
            .range(last_trade_price..)
            .map(|(k, _)| *k)
            .collect();
        for price in keys.into_iter().rev() {
            if let Some(bucket) = self.sell_stops.remove(&price) {
                triggered.extend(bucket);
            }
        }
        triggered
    }

    /// Pops every buy stop with `stop_price <= last_trade_price`, in ascending stop-price order.
    pub fn pop_triggered_buy_stops(&mut self, last_trade_price: Decimal) -> Vec<Order> {
        let mut triggered = Vec::new();
        let keys: Vec<Decimal> = self
            .buy_stops
            .range(..=last_trade_price)
            .map(|(k, _)| *k)
            .collect();
        for price in keys {
            if let Some(bucket) = self.buy_stops.remove(&price) {
                triggered.extend(bucket);
            }
        }
        triggered
    }

    pub fn is_empty(&self) -> bool {
        self.buy_stops.is_empty() && self.sell_stops.is_empty()
    }

    pub fn buy_stops(&self) -> impl Iterator<Item = &Order> {
        self.buy_stops.values().flatten()
    }

    pub fn sell_stops(&self) -> impl Iterator<Item = &Order> {
        self.sell_stops.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{OrderStatus, OrderType, TimeInForce};
    use chrono::Utc;

    fn stop_order(side: Side, order_type: OrderType, stop_price: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            instrument_id: Uuid::new_v4(),
            side,
            order_type,
            tif: TimeInForce::GTC,
            quantity: Decimal::from_i64(10),
            original_quantity: Decimal::from_i64(10),
            price: Decimal::from_i64(100),
            stop_price: Some(Decimal::from_i64(stop_price)),
            oco_id: None,
            created_at: Utc::now(),
            user_tag: String::new(),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn sell_stops_trigger_as_price_falls_to_or_through() {
        let mut book = StopBook::new();
        book.insert(stop_order(Side::Sell, OrderType::Stop, 105));
        book.insert(stop_order(Side::Sell, OrderType::Stop, 103));
        book.insert(stop_order(Side::Sell, OrderType::Stop, 101));

        // Last trade fell to 103: 103 and 105 both have stop_price >= 103.
        let triggered = book.pop_triggered_sell_stops(Decimal::from_i64(103));
        let mut prices: Vec<i64> = triggered
            .iter()
            .map(|o| o.stop_price.unwrap_or(Decimal::ZERO).scaled() / 1000)
            .collect();
        prices.sort();
        assert_eq!(prices, vec![103, 105]);
        assert_eq!(book.sell_stops().count(), 1);
    }

    #[test]
    fn buy_stops_trigger_as_price_rises_to_or_through() {
        let mut book = StopBook::new();
        book.insert(stop_order(Side::Buy, OrderType::StopLimit, 105));
        book.insert(stop_order(Side::Buy, OrderType::StopLimit, 107));
        book.insert(stop_order(Side::Buy, OrderType::StopLimit, 110));

        let triggered = book.pop_triggered_buy_stops(Decimal::from_i64(107));
        let mut prices: Vec<i64> = triggered
            .iter()
            .map(|o| o.stop_price.unwrap_or(Decimal::ZERO).scaled() / 1000)
            .collect();
        prices.sort();
        assert_eq!(prices, vec![105, 107]);
        assert_eq!(book.buy_stops().count(), 1);
    }

    #[test]
    fn remove_drops_empty_bucket() {
        let mut book = StopBook::new();
        let order = stop_order(Side::Buy, OrderType::Stop, 100);
        let id = order.id;
        book.insert(order);
        let removed = book.remove(Side::Buy, Decimal::from_i64(100), id);
        assert!(removed.is_some());
        assert!(book.is_empty());
    }
}
