//! Order resource: service operations and their HTTP handlers

pub mod handlers;
pub mod service;

pub use handlers::{DataEnvelope, OrdersState};
pub use service::OrderService;
