//! HTTP handlers for order operations
//!
//! Handlers are thin: they unwrap the request envelope, call the
//! [`OrderService`], and wrap the result as `{ "data": ... }`.

use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::error::{OrderError, OrderResult};
use crate::core::order::Order;
use crate::core::validation::OrderPayload;
use crate::orders::service::OrderService;

/// Application state shared across order handlers
#[derive(Clone)]
pub struct OrdersState {
    pub service: Arc<OrderService>,
}

/// Response envelope: every successful body is `{ "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// List all orders
///
/// GET /orders
pub async fn list_orders(
    State(state): State<OrdersState>,
) -> OrderResult<Json<DataEnvelope<Vec<Order>>>> {
    let orders = state.service.list().await?;
    Ok(Json(DataEnvelope::new(orders)))
}

/// Create an order
///
/// POST /orders
pub async fn create_order(
    State(state): State<OrdersState>,
    OrderPayload(data): OrderPayload,
) -> OrderResult<(StatusCode, Json<DataEnvelope<Order>>)> {
    let order = state.service.create(&data).await?;
    Ok((StatusCode::CREATED, Json(DataEnvelope::new(order))))
}

/// Get one order
///
/// GET /orders/{orderId}
pub async fn get_order(
    State(state): State<OrdersState>,
    Path(order_id): Path<String>,
) -> OrderResult<Json<DataEnvelope<Order>>> {
    let order = state.service.read(&order_id).await?;
    Ok(Json(DataEnvelope::new(order)))
}

/// Replace the mutable fields of an order
///
/// PUT /orders/{orderId}
pub async fn update_order(
    State(state): State<OrdersState>,
    Path(order_id): Path<String>,
    OrderPayload(data): OrderPayload,
) -> OrderResult<Json<DataEnvelope<Order>>> {
    let order = state.service.update(&order_id, &data).await?;
    Ok(Json(DataEnvelope::new(order)))
}

/// Delete a pending order
///
/// DELETE /orders/{orderId}
pub async fn delete_order(
    State(state): State<OrdersState>,
    Path(order_id): Path<String>,
) -> OrderResult<StatusCode> {
    state.service.delete(&order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for a bound path hit with an unsupported method
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> OrderError {
    OrderError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Fallback for paths no route matches
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> OrderError {
    OrderError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
