//! Order entity and its wire representation

use crate::core::error::{OrderError, OrderResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Parse the wire form of a status
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// `delivered` is terminal: no update may leave or re-enter it
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a JSON number as a whole, non-negative count
///
/// `2` and `2.0` are the same count; `2.5`, `-1` and anything beyond `u64`
/// are not counts at all.
pub fn integral_quantity(number: &Number) -> Option<u64> {
    if let Some(quantity) = number.as_u64() {
        return Some(quantity);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
        .map(|f| f as u64)
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    integral_quantity(&number)
        .ok_or_else(|| de::Error::custom(format!("quantity {} is not a whole number", number)))
}

/// One line of an order: a dish and how many of it
///
/// Only `quantity` is interpreted; the dish details (`id`, `name`, `price`,
/// ...) are kept exactly as the client sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishLine {
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: u64,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl DishLine {
    pub fn new(quantity: u64) -> Self {
        Self {
            quantity,
            details: Map::new(),
        }
    }
}

/// A stored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub deliver_to: String,
    pub mobile_number: String,
    pub status: OrderStatus,
    pub dishes: Vec<DishLine>,
}

impl Order {
    /// Build a new order from a validated draft and a freshly allocated id
    pub fn from_draft(id: String, draft: OrderDraft) -> Self {
        Self {
            id,
            deliver_to: draft.deliver_to,
            mobile_number: draft.mobile_number,
            status: draft.status,
            dishes: draft.dishes,
        }
    }

    /// Overwrite all four mutable fields at once; the id never changes
    pub fn apply(&mut self, draft: OrderDraft) {
        self.deliver_to = draft.deliver_to;
        self.mobile_number = draft.mobile_number;
        self.status = draft.status;
        self.dishes = draft.dishes;
    }
}

/// The mutable fields of an order, as carried by a create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub deliver_to: String,
    pub mobile_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub dishes: Vec<DishLine>,
}

impl OrderDraft {
    /// Read a draft out of the `data` object of a request
    ///
    /// Runs after the check chain, so only shape problems the checks do not
    /// look at (a numeric `deliverTo`, an unknown status on create) end up
    /// here. The deserializer's diagnostic is logged, never returned.
    pub fn from_payload(payload: &Value) -> OrderResult<Self> {
        serde_json::from_value(payload.clone()).map_err(|e| {
            tracing::debug!(error = %e, "order payload has the wrong shape");
            OrderError::validation("Invalid order payload")
        })
    }
}
