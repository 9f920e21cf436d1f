//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// HTTP error mapping (SPEC_FULL.md §6). Grounded on the source's `api/error.rs`
// (`thiserror` + `IntoResponse`), narrowed to the error kinds this core's engine and registry
// actually produce.
//--------------------------------------------------------------------------------------------------

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::domain::services::{MatchingError, RegistryError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidArgument(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::AlreadyExists(m) => (StatusCode::CONFLICT, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<MatchingError> for ApiError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::InvalidQuantity
            | MatchingError::InvalidPrice
            | MatchingError::InvalidStopPrice
            | MatchingError::InvalidTif => ApiError::InvalidArgument(err.to_string()),
            MatchingError::DuplicateOrderId(_) => ApiError::AlreadyExists(err.to_string()),
            MatchingError::OrderNotFound(_) => ApiError::NotFound(err.to_string()),
            MatchingError::BackendFailure(_) | MatchingError::Invariant(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyExists(_) => ApiError::AlreadyExists(err.to_string()),
            RegistryError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}
