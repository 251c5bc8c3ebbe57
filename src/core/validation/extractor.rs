//! Axum extractor for the request envelope
//!
//! Order requests carry their fields inside `{ "data": { ... } }`. The
//! [`OrderPayload`] extractor unwraps that envelope before the check chain
//! sees it. A missing body, a missing `data` key or `"data": null` all yield
//! an empty object, so checks report missing fields instead of crashing.

use crate::core::error::OrderError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

/// The `data` object of a request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<OrdersState>,
///     OrderPayload(data): OrderPayload,
/// ) -> OrderResult<impl IntoResponse> {
///     // data is the unwrapped `data` object
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload(pub Value);

impl OrderPayload {
    /// Unwrap the envelope of an already parsed body
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => match fields.remove("data") {
                Some(Value::Null) | None => Self::empty(),
                Some(data) => Self(data),
            },
            _ => Self::empty(),
        }
    }

    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl<S> FromRequest<S> for OrderPayload
where
    S: Send + Sync,
{
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "failed to read request body");
            OrderError::InvalidJson
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "request body is not valid JSON");
            OrderError::InvalidJson
        })?;

        Ok(Self::from_body(body))
    }
}
