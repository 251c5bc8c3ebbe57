//! In-memory implementation of OrderStore

use crate::core::order::{Order, OrderDraft};
use crate::core::store::OrderStore;
use anyhow::{Result, bail};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory order store
///
/// Records live in an insertion-ordered map behind an async RwLock, so list
/// results come back in creation order and every operation is atomic.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<IndexMap<String, Order>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `orders`
    ///
    /// A later order with the same id as an earlier one replaces it.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        let orders = orders
            .into_iter()
            .map(|order| (order.id.clone(), order))
            .collect();
        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn append(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;

        if orders.contains_key(&order.id) {
            bail!("Order {} already exists", order.id);
        }

        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn find(&self, id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }

    async fn update(&self, id: &str, draft: OrderDraft) -> Result<Option<Order>> {
        let mut orders = self.orders.write().await;

        Ok(orders.get_mut(id).map(|order| {
            order.apply(draft);
            order.clone()
        }))
    }

    async fn remove(&self, id: &str) -> Result<Option<Order>> {
        let mut orders = self.orders.write().await;
        Ok(orders.shift_remove(id))
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }
}
