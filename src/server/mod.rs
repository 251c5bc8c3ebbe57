//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - the order routes with their 405 method fallbacks
//! - health check routes
//! - a 404 fallback for unknown paths

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::build_order_routes;
