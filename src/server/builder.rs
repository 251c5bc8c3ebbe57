//! ServerBuilder for fluent API to build the HTTP server

use super::router::build_order_routes;
use crate::config::ServerConfig;
use crate::core::order::Order;
use crate::core::store::{IdAllocator, OrderStore, UuidIdAllocator};
use crate::orders::handlers::route_not_found;
use crate::orders::{OrderService, OrdersState};
use crate::storage::InMemoryOrderStore;
use anyhow::{Result, bail};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the orders HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_id_allocator(SequentialIdAllocator::new())
///     .with_seed_orders(orders)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn OrderStore>>,
    id_allocator: Option<Arc<dyn IdAllocator>>,
    seed_orders: Vec<Order>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            id_allocator: None,
            seed_orders: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Builder with the seed orders named by `config`, if any
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Ok(Self::new().with_seed_orders(config.load_seed_orders()?))
    }

    /// Use a custom record store instead of the in-memory one
    pub fn with_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use a custom id allocator (default: random hex ids)
    pub fn with_id_allocator(mut self, ids: impl IdAllocator + 'static) -> Self {
        self.id_allocator = Some(Arc::new(ids));
        self
    }

    /// Orders the built-in in-memory store starts with
    pub fn with_seed_orders(mut self, orders: Vec<Order>) -> Self {
        self.seed_orders.extend(orders);
        self
    }

    /// Add routes next to the order routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the order service the routes are served from
    pub fn build_service(&mut self) -> Result<Arc<OrderService>> {
        let seed_orders = std::mem::take(&mut self.seed_orders);

        let store = match self.store.take() {
            Some(_) if !seed_orders.is_empty() => {
                bail!("Seed orders can only be loaded into the built-in in-memory store")
            }
            Some(store) => store,
            None => Arc::new(InMemoryOrderStore::with_orders(seed_orders)) as Arc<dyn OrderStore>,
        };

        let ids = self
            .id_allocator
            .take()
            .unwrap_or_else(|| Arc::new(UuidIdAllocator) as Arc<dyn IdAllocator>);

        Ok(Arc::new(OrderService::new(store, ids)))
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health check routes
    /// - Order routes
    /// - Custom routes
    /// - A 404 fallback for unknown paths
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let state = OrdersState { service };

        let mut app = Self::health_routes().merge(build_order_routes(state));
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app
            .fallback(route_not_found)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/healthz", get(health_check))
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "grubdash"
    }))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
