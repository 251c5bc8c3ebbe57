//! Typed error handling for the orders API
//!
//! Every failure the API can report is a variant of [`OrderError`]. Each
//! variant knows its HTTP status code and renders itself as a JSON body of
//! the form `{ "error": "<message>" }`, so a failing validation check maps
//! one-to-one onto the response the client sees.
//!
//! # Example
//!
//! ```rust,ignore
//! use grubdash::prelude::*;
//!
//! match service.read("42").await {
//!     Ok(order) => println!("{}", order.id),
//!     Err(OrderError::NotFound { message }) => println!("{}", message),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the orders API
#[derive(Debug, Error)]
pub enum OrderError {
    /// A request failed one of the validation checks
    #[error("{message}")]
    Validation { message: String },

    /// The order addressed by the route does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// The path is bound but not for this HTTP method
    #[error("{method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// No route matches the requested path
    #[error("Path not found: {path}")]
    RouteNotFound { path: String },

    /// The request body is not valid JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// The record store failed (never shown to clients verbatim)
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl OrderError {
    /// Build a 400 validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        OrderError::Validation {
            message: message.into(),
        }
    }

    /// Build a 404 failure for a missing order
    pub fn not_found(message: impl Into<String>) -> Self {
        OrderError::NotFound {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation { .. } => StatusCode::BAD_REQUEST,
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            OrderError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::InvalidJson => StatusCode::BAD_REQUEST,
            OrderError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Validation { .. } => "VALIDATION_ERROR",
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            OrderError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            OrderError::InvalidJson => "INVALID_JSON",
            OrderError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage failures are reduced to a generic message; everything else
    /// carries its templated message unchanged. Parser diagnostics never
    /// reach a message, they are logged where they occur.
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            OrderError::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorResponse { error }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let OrderError::Storage(e) = &self {
            tracing::warn!(error = %e, "order store failure");
        }
        (status, Json(self.to_response())).into_response()
    }
}

/// A specialized Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;
