//! Error types for the grid core
//!
//! Provides unified error handling using thiserror.
//!
//! Path resolution never produces an error: a path that cannot be followed
//! yields `None`. Only configuration and sorting requests can fail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Grid Error Enum ==
/// Unified error type for the grid core and its HTTP host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Non-positive capacity or page size
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The resolved values of a column have no natural ordering
    #[error("Column cannot be sorted: {0}")]
    UnsortableColumn(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Row or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        let status = match &self {
            GridError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            GridError::UnsortableColumn(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GridError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GridError::NotFound(_) => StatusCode::NOT_FOUND,
            GridError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the grid core.
pub type Result<T> = std::result::Result<T, GridError>;
