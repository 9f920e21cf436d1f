//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Abstraction over order storage: indexed order lookup by id, side containers, a stop book, and
// an OCO index (SPEC_FULL.md §4.3). Two implementations satisfy this contract: an in-memory one
// (`memory::InMemoryBackend`) and a remote key-value one (`remote::RemoteBackend`).
//--------------------------------------------------------------------------------------------------

pub mod memory;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{Decimal, Order, Side};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("order {0} already exists")]
    DuplicateOrder(Uuid),
    #[error("order {0} not found")]
    OrderNotFound(Uuid),
    #[error("backend transport or storage failure: {0}")]
    Transport(String),
}

/// Read-only view of one side of the book, in priority order: (price, total quantity, order count).
pub type SideDepth = Vec<(Decimal, Decimal, usize)>;

/// Storage contract shared by the in-memory and remote key-value backends.
///
/// Guarantees required of any implementation: by-id lookup returns the same logical order as is
/// referenced from the side or stop collections; side operations never reorder within a level;
/// operations on one book never observe state from another book (namespace isolation).
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, BackendError>;

    /// Stores a brand-new order in the id index. Errors if the id already exists.
    async fn store_order(&self, order: Order) -> Result<(), BackendError>;

    /// Persists a mutated order (e.g. a decremented resting quantity).
    async fn update_order(&self, order: Order) -> Result<(), BackendError>;

    /// Removes an order from the id index only. Idempotent on an already-absent id.
    async fn delete_order(&self, id: Uuid) -> Result<(), BackendError>;

    async fn append_to_side(&self, order: Order) -> Result<(), BackendError>;

    /// Removes an order from its side container (and the id index). Returns the removed order.
    async fn remove_from_side(
        &self,
        side: Side,
        price: Decimal,
        order_id: Uuid,
    ) -> Result<Option<Order>, BackendError>;

    /// Best price on `side`, or None if that side is empty.
    async fn best_price(&self, side: Side) -> Result<Option<Decimal>, BackendError>;

    /// The earliest-arriving order at `price` on `side`, without removing it.
    async fn head_of_level(
        &self,
        side: Side,
        price: Decimal,
    ) -> Result<Option<Order>, BackendError>;

    /// Decrements the head order's quantity in place, preserving its position in the level.
    async fn decrement_head(
        &self,
        side: Side,
        price: Decimal,
        order_id: Uuid,
        by: Decimal,
    ) -> Result<(), BackendError>;

    /// Cumulative quantity on `side` at prices acceptable to a `taker_side` order limited at
    /// `limit_price` (used by the FOK pre-check).
    async fn cumulative_acceptable(
        &self,
        side: Side,
        taker_side: Side,
        limit_price: Decimal,
    ) -> Result<Decimal, BackendError>;

    async fn append_to_stop_book(&self, order: Order) -> Result<(), BackendError>;

    async fn remove_from_stop_book(
        &self,
        side: Side,
        stop_price: Decimal,
        order_id: Uuid,
    ) -> Result<Option<Order>, BackendError>;

    async fn pop_triggered_sell_stops(
        &self,
        last_trade_price: Decimal,
    ) -> Result<Vec<Order>, BackendError>;

    async fn pop_triggered_buy_stops(
        &self,
        last_trade_price: Decimal,
    ) -> Result<Vec<Order>, BackendError>;

    /// Links two orders as an OCO pair. Both ids must already be stored.
    async fn link_oco(&self, a: Uuid, b: Uuid) -> Result<(), BackendError>;

    /// Returns the OCO partner of `id`, if any, and clears the link so the partner is not
    /// processed twice.
    async fn check_oco(&self, id: Uuid) -> Result<Option<Uuid>, BackendError>;

    async fn get_bids(&self) -> Result<SideDepth, BackendError>;

    async fn get_asks(&self) -> Result<SideDepth, BackendError>;
}
