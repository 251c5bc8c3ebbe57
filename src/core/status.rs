//! Order status transition rules
//!
//! Two questions are answered here, against two different fields:
//!
//! - may an update move an order to the status it carries? (incoming target)
//! - may an order be deleted right now? (current stored status)

use crate::core::error::{OrderError, OrderResult};
use crate::core::order::OrderStatus;
use serde_json::Value;

pub const DELIVERED_IS_FINAL: &str = "A delivered order cannot be changed";
pub const DELETE_REQUIRES_PENDING: &str = "An order cannot be deleted unless it is pending";

/// Stateless guard over the order status machine
pub struct StatusGuard;

impl StatusGuard {
    /// Message listing every legal status value
    pub fn enumeration_message() -> String {
        let names: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("Order must have a status of {}", names.join(", "))
    }

    /// Check the target status of an update
    ///
    /// `current` is the stored status of the order being updated, when known.
    /// An order that is already delivered is refused whatever the target.
    pub fn ensure_assignable(
        current: Option<OrderStatus>,
        target: Option<&Value>,
    ) -> OrderResult<OrderStatus> {
        if current.is_some_and(|status| status.is_terminal()) {
            return Err(OrderError::validation(DELIVERED_IS_FINAL));
        }

        match target.and_then(Value::as_str).and_then(OrderStatus::parse) {
            Some(status) if status.is_terminal() => Err(OrderError::validation(DELIVERED_IS_FINAL)),
            Some(status) => Ok(status),
            None => Err(OrderError::validation(Self::enumeration_message())),
        }
    }

    /// Check that an order in `current` status may be deleted
    pub fn ensure_deletable(current: OrderStatus) -> OrderResult<()> {
        if current == OrderStatus::Pending {
            Ok(())
        } else {
            Err(OrderError::validation(DELETE_REQUIRES_PENDING))
        }
    }
}
