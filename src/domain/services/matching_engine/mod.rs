//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The error taxonomy for the matching engine (SPEC_FULL.md §7) and the `OrderBook` state machine
// itself, which lives in `engine.rs`.
//--------------------------------------------------------------------------------------------------

pub mod engine;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::services::backend::BackendError;

pub use engine::OrderBook;

/// Error taxonomy for a single `OrderBook.process`/`cancel` call.
#[derive(Error, Debug, Clone)]
pub enum MatchingError {
    #[error("invalid quantity: must be strictly positive")]
    InvalidQuantity,
    #[error("invalid price: must be strictly positive for Limit/StopLimit orders")]
    InvalidPrice,
    #[error("invalid stop price: must be strictly positive for Stop/StopLimit orders")]
    InvalidStopPrice,
    #[error("invalid time-in-force for this order type")]
    InvalidTif,
    #[error("duplicate order id: {0}")]
    DuplicateOrderId(Uuid),
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),
    #[error("backend failure: {0}")]
    BackendFailure(#[from] BackendError),
    #[error("invariant violated: {0}")]
    Invariant(String),
}
