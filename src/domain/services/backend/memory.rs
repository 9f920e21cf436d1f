//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// In-memory backend: a hash index id -> location, two OrderSide containers, a StopBook, and an
// OCO hash index. All operations are synchronous under the hood (wrapped in `parking_lot::RwLock`)
// and exposed through the async Backend trait for parity with the remote implementation.
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::models::{Decimal, Order, Side};
use crate::domain::services::order_side::OrderSide;
use crate::domain::services::stop_book::StopBook;

use super::{Backend, BackendError, SideDepth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Side(Side, Decimal),
    Stop(Side, Decimal),
}

struct State {
    bids: OrderSide,
    asks: OrderSide,
    stop_book: StopBook,
    locations: HashMap<Uuid, Location>,
    oco: HashMap<Uuid, Uuid>,
}

impl State {
    fn new() -> Self {
        Self {
            bids: OrderSide::new(Side::Buy),
            asks: OrderSide::new(Side::Sell),
            stop_book: StopBook::new(),
            locations: HashMap::new(),
            oco: HashMap::new(),
        }
    }

    fn side(&self, side: Side) -> &OrderSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut OrderSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

/// An in-memory, process-local implementation of the Backend contract.
pub struct InMemoryBackend {
    state: RwLock<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, BackendError> {
        let state = self.state.read();
        let Some(location) = state.locations.get(&id) else {
            return Ok(None);
        };
        let found = match *location {
            Location::Side(side, price) => find_in_side(state.side(side), price, id),
            Location::Stop(side, stop_price) => find_in_stop(&state.stop_book, side, stop_price, id),
        };
        Ok(found)
    }

    /// Checks for a duplicate id. A freshly validated order is not placed in a side or stop
    /// container until `append_to_side`/`append_to_stop_book` runs, so this is purely the
    /// duplicate-id guard §4.4.2 requires before dispatch.
    async fn store_order(&self, order: Order) -> Result<(), BackendError> {
        let state = self.state.read();
        if state.locations.contains_key(&order.id) {
            return Err(BackendError::DuplicateOrder(order.id));
        }
        Ok(())
    }

    async fn update_order(&self, order: Order) -> Result<(), BackendError> {
        let mut state = self.state.write();
        match state.locations.get(&order.id).copied() {
            Some(Location::Side(side, price)) => {
                replace_in_side(state.side_mut(side), price, order);
                Ok(())
            }
            Some(Location::Stop(side, stop_price)) => {
                replace_in_stop(&mut state.stop_book, side, stop_price, order);
                Ok(())
            }
            None => Err(BackendError::OrderNotFound(order.id)),
        }
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), BackendError> {
        let mut state = self.state.write();
        state.locations.remove(&id);
        Ok(())
    }

    async fn append_to_side(&self, order: Order) -> Result<(), BackendError> {
        let mut state = self.state.write();
        let location = Location::Side(order.side, order.price);
        state.locations.insert(order.id, location);
        state.side_mut(order.side).append(order);
        Ok(())
    }

    async fn remove_from_side(
        &self,
        side: Side,
        price: Decimal,
        order_id: Uuid,
    ) -> Result<Option<Order>, BackendError> {
        let mut state = self.state.write();
        let removed = state.side_mut(side).remove(price, order_id);
        if removed.is_some() {
            state.locations.remove(&order_id);
        }
        Ok(removed)
    }

    async fn best_price(&self, side: Side) -> Result<Option<Decimal>, BackendError> {
        Ok(self.state.read().side(side).best_price())
    }

    async fn head_of_level(
        &self,
        side: Side,
        price: Decimal,
    ) -> Result<Option<Order>, BackendError> {
        let state = self.state.read();
        Ok(find_in_side(state.side(side), price, find_head_id(state.side(side), price)?))
    }

    async fn decrement_head(
        &self,
        side: Side,
        price: Decimal,
        order_id: Uuid,
        by: Decimal,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write();
        let Some(level) = level_at(state.side_mut(side), price) else {
            return Err(BackendError::OrderNotFound(order_id));
        };
        let Some(head) = level.head_mut() else {
            return Err(BackendError::OrderNotFound(order_id));
        };
        if head.id != order_id {
            return Err(BackendError::OrderNotFound(order_id));
        }
        head.quantity = head
            .quantity
            .checked_sub(by)
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn cumulative_acceptable(
        &self,
        side: Side,
        taker_side: Side,
        limit_price: Decimal,
    ) -> Result<Decimal, BackendError> {
        Ok(self.state.read().side(side).cumulative_acceptable(taker_side, limit_price))
    }

    async fn append_to_stop_book(&self, order: Order) -> Result<(), BackendError> {
        let mut state = self.state.write();
        let stop_price = order
            .stop_price
            .ok_or_else(|| BackendError::Transport("stop order missing stop_price".to_string()))?;
        state
            .locations
            .insert(order.id, Location::Stop(order.side, stop_price));
        state.stop_book.insert(order);
        Ok(())
    }

    async fn remove_from_stop_book(
        &self,
        side: Side,
        stop_price: Decimal,
        order_id: Uuid,
    ) -> Result<Option<Order>, BackendError> {
        let mut state = self.state.write();
        let removed = state.stop_book.remove(side, stop_price, order_id);
        if removed.is_some() {
            state.locations.remove(&order_id);
        }
        Ok(removed)
    }

    async fn pop_triggered_sell_stops(
        &self,
        last_trade_price: Decimal,
    ) -> Result<Vec<Order>, BackendError> {
        let mut state = self.state.write();
        let triggered = state.stop_book.pop_triggered_sell_stops(last_trade_price);
        for order in &triggered {
            state.locations.remove(&order.id);
        }
        Ok(triggered)
    }

    async fn pop_triggered_buy_stops(
        &self,
        last_trade_price: Decimal,
    ) -> Result<Vec<Order>, BackendError> {
        let mut state = self.state.write();
        let triggered = state.stop_book.pop_triggered_buy_stops(last_trade_price);
        for order in &triggered {
            state.locations.remove(&order.id);
        }
        Ok(triggered)
    }

    async fn link_oco(&self, a: Uuid, b: Uuid) -> Result<(), BackendError> {
        let mut state = self.state.write();
        state.oco.insert(a, b);
        state.oco.insert(b, a);
        Ok(())
    }

    async fn check_oco(&self, id: Uuid) -> Result<Option<Uuid>, BackendError> {
        let mut state = self.state.write();
        let Some(partner) = state.oco.remove(&id) else {
            return Ok(None);
        };
        state.oco.remove(&partner);
        Ok(Some(partner))
    }

    async fn get_bids(&self) -> Result<SideDepth, BackendError> {
        Ok(self.state.read().bids.depth())
    }

    async fn get_asks(&self) -> Result<SideDepth, BackendError> {
        Ok(self.state.read().asks.depth())
    }
}

fn level_at(side: &mut OrderSide, price: Decimal) -> Option<&mut crate::domain::services::price_level::PriceLevel> {
    if side.best_price() == Some(price) {
        side.best_level_mut()
    } else {
        None
    }
}

fn find_head_id(side: &OrderSide, price: Decimal) -> Result<Uuid, BackendError> {
    if side.best_price() != Some(price) {
        return Err(BackendError::Transport(
            "head_of_level queried a non-best price; only the best level's head is addressable".to_string(),
        ));
    }
    side.best_level()
        .and_then(|l| l.head())
        .map(|o| o.id)
        .ok_or_else(|| BackendError::Transport("empty level".to_string()))
}

fn find_in_side(side: &OrderSide, price: Decimal, id: Uuid) -> Option<Order> {
    if side.best_price() == Some(price) {
        side.best_level()?.iter().find(|o| o.id == id).cloned()
    } else {
        side.levels_in_priority()
            .find(|(p, _)| **p == price)
            .and_then(|(_, level)| level.iter().find(|o| o.id == id).cloned())
    }
}

fn replace_in_side(side: &mut OrderSide, price: Decimal, order: Order) {
    let id = order.id;
    side.remove(price, id);
    side.append(order);
}

fn find_in_stop(book: &StopBook, side: Side, _stop_price: Decimal, id: Uuid) -> Option<Order> {
    match side {
        Side::Buy => book.buy_stops().find(|o| o.id == id).cloned(),
        Side::Sell => book.sell_stops().find(|o| o.id == id).cloned(),
    }
}

fn replace_in_stop(book: &mut StopBook, side: Side, stop_price: Decimal, order: Order) {
    let id = order.id;
    book.remove(side, stop_price, id);
    book.insert(order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{OrderStatus, OrderType, TimeInForce};
    use chrono::Utc;

    fn order(side: Side, price: i64, qty: i64) -> Order {
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
            status: OrderStatus::Open,
        }
    }

    #[tokio::test]
    async fn append_and_lookup_round_trip() {
        let backend = InMemoryBackend::new();
        let o = order(Side::Buy, 95, 10);
        let id = o.id;
        let res = backend.append_to_side(o).await;
        assert!(res.is_ok());
        let found = match backend.get_order(id).await {
            Ok(found) => found,
            Err(e) => panic!("unexpected backend error: {:?}", e),
        };
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn decrement_head_preserves_position() {
        let backend = InMemoryBackend::new();
        let first = order(Side::Sell, 100, 5);
        let second = order(Side::Sell, 100, 7);
        let first_id = first.id;
        backend.append_to_side(first).await.unwrap_or(());
        backend.append_to_side(second).await.unwrap_or(());

        let res = backend
            .decrement_head(Side::Sell, Decimal::from_i64(100), first_id, Decimal::from_i64(2))
            .await;
        assert!(res.is_ok());
        let head = match backend.head_of_level(Side::Sell, Decimal::from_i64(100)).await {
            Ok(h) => h,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        let head = match head {
            Some(h) => h,
            None => panic!("expected a head order"),
        };
        assert_eq!(head.id, first_id);
        assert_eq!(head.quantity, Decimal::from_i64(3));
    }

    #[tokio::test]
    async fn oco_link_resolves_once() {
        let backend = InMemoryBackend::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        backend.link_oco(a, b).await.unwrap_or(());
        let partner = match backend.check_oco(a).await {
            Ok(p) => p,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        assert_eq!(partner, Some(b));
        let second = match backend.check_oco(b).await {
            Ok(p) => p,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        assert_eq!(second, None);
    }
}
