//! Route table for the order resource

use crate::orders::OrdersState;
use crate::orders::handlers::{
    create_order, delete_order, get_order, list_orders, method_not_allowed, update_order,
};
use axum::{Router, routing::get};

/// Build the order routes
///
/// - GET    /orders            - List orders
/// - POST   /orders            - Create an order
/// - GET    /orders/{orderId}  - Get one order
/// - PUT    /orders/{orderId}  - Update an order
/// - DELETE /orders/{orderId}  - Delete a pending order
///
/// Any other method on these paths answers 405.
pub fn build_order_routes(state: OrdersState) -> Router {
    Router::new()
        .route(
            "/orders",
            get(list_orders)
                .post(create_order)
                .fallback(method_not_allowed),
        )
        .route(
            "/orders/{orderId}",
            get(get_order)
                .put(update_order)
                .delete(delete_order)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}
