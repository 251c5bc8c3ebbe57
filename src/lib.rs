//! # GrubDash
//!
//! An order intake API for a food delivery service.
//!
//! ## Features
//!
//! - **Validation Pipeline**: every create, update and delete runs an ordered
//!   chain of checks; the first failure becomes the response
//! - **Status Lifecycle**: `pending → preparing → out-for-delivery → delivered`,
//!   with delivered orders frozen and only pending orders deletable
//! - **Storage-Agnostic**: the pipeline talks to an `OrderStore` trait; an
//!   insertion-ordered in-memory store ships by default
//! - **Typed Errors**: each failure carries its HTTP status and a fixed message
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grubdash::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_id_allocator(SequentialIdAllocator::new())
//!         .serve("127.0.0.1:5000")
//!         .await
//! }
//! ```
//!
//! ```text
//! POST   /orders             {"data": {...}}  → 201 {"data": order}
//! GET    /orders                              → 200 {"data": [order, ...]}
//! GET    /orders/{orderId}                    → 200 {"data": order}
//! PUT    /orders/{orderId}   {"data": {...}}  → 200 {"data": order}
//! DELETE /orders/{orderId}                    → 204
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{OrderError, OrderResult},
        order::{DishLine, Order, OrderDraft, OrderStatus},
        status::StatusGuard,
        store::{IdAllocator, OrderStore, SequentialIdAllocator, UuidIdAllocator},
        validation::{Check, CheckContext, OrderPayload, Pipeline},
    };

    // === Orders ===
    pub use crate::orders::{DataEnvelope, OrderService, OrdersState};

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;

    // === Config ===
    pub use crate::config::ServerConfig;

    // === Server ===
    pub use crate::server::{ServerBuilder, build_order_routes};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
