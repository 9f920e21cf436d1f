//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Thin HTTP adapter over the registry (SPEC_FULL.md §6): request parsing, a 1:1 call into the
// core, and response shaping. No business logic lives here. Grounded on the source's `api/mod.rs`
// router wiring.
//--------------------------------------------------------------------------------------------------

pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Extension, Router};

pub use routes::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/books", post(routes::create_book).get(routes::list_books))
        .route("/books/:name", delete(routes::delete_book))
        .route("/books/:name/state", get(routes::get_book_state))
        .route("/books/:name/orders", post(routes::create_order))
        .route(
            "/books/:name/orders/:id",
            get(routes::get_order).delete(routes::cancel_order),
        )
        .layer(Extension(state))
}
