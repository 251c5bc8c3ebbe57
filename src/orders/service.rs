//! Order operations: each mutation runs only after its pipeline passes

use crate::core::error::{OrderError, OrderResult};
use crate::core::order::{Order, OrderDraft};
use crate::core::store::{IdAllocator, OrderStore};
use crate::core::validation::{CheckContext, Pipeline};
use anyhow::anyhow;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Allocator draws tried before create gives up on finding a free id
const MAX_ID_ATTEMPTS: usize = 16;

/// Entry point for every order operation
///
/// Mutating operations hold a write gate from their first check to the end
/// of the mutation, so no other writer can change the order in between.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    ids: Arc<dyn IdAllocator>,
    create: Pipeline,
    read: Pipeline,
    update: Pipeline,
    delete: Pipeline,
    writes: Mutex<()>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, ids: Arc<dyn IdAllocator>) -> Self {
        Self {
            create: Pipeline::for_create(),
            read: Pipeline::for_read(store.clone()),
            update: Pipeline::for_update(store.clone()),
            delete: Pipeline::for_delete(store.clone()),
            store,
            ids,
            writes: Mutex::new(()),
        }
    }

    /// Create an order from the `data` object of a request
    pub async fn create(&self, payload: &Value) -> OrderResult<Order> {
        let _gate = self.writes.lock().await;

        let mut ctx = CheckContext::new(payload);
        self.create.run(&mut ctx).await?;
        let draft = OrderDraft::from_payload(payload)?;

        let id = self.fresh_id().await?;
        let order = self.store.append(Order::from_draft(id, draft)).await?;

        tracing::info!(order_id = %order.id, status = %order.status, "order created");
        Ok(order)
    }

    /// Fetch one order
    pub async fn read(&self, id: &str) -> OrderResult<Order> {
        let payload = Value::Null;
        let mut ctx = CheckContext::new(&payload).with_route_id(id);
        self.read.run(&mut ctx).await?;
        Self::resolved(ctx)
    }

    /// Overwrite the mutable fields of an existing order
    pub async fn update(&self, id: &str, payload: &Value) -> OrderResult<Order> {
        let _gate = self.writes.lock().await;

        let mut ctx = CheckContext::new(payload).with_route_id(id);
        self.update.run(&mut ctx).await?;
        let record = Self::resolved(ctx)?;
        let draft = OrderDraft::from_payload(payload)?;

        let order = self
            .store
            .update(&record.id, draft)
            .await?
            .ok_or_else(|| OrderError::not_found(format!("Order does not exist: {}", record.id)))?;

        tracing::info!(
            order_id = %order.id,
            from = %record.status,
            to = %order.status,
            "order updated"
        );
        Ok(order)
    }

    /// Remove a pending order
    pub async fn delete(&self, id: &str) -> OrderResult<()> {
        let _gate = self.writes.lock().await;

        let payload = Value::Null;
        let mut ctx = CheckContext::new(&payload).with_route_id(id);
        self.delete.run(&mut ctx).await?;
        let record = Self::resolved(ctx)?;

        self.store.remove(&record.id).await?;

        tracing::info!(order_id = %record.id, "order deleted");
        Ok(())
    }

    /// Every order, in creation order
    pub async fn list(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.list().await?)
    }

    /// Allocate an id no stored order uses yet
    async fn fresh_id(&self) -> OrderResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if self.store.find(&id).await?.is_none() {
                return Ok(id);
            }
            tracing::debug!(order_id = %id, "allocated id already in use, retrying");
        }
        Err(anyhow!("no free order id after {} attempts", MAX_ID_ATTEMPTS).into())
    }

    fn resolved(ctx: CheckContext<'_>) -> OrderResult<Order> {
        ctx.into_record()
            .ok_or_else(|| anyhow!("pipeline passed without resolving the order").into())
    }
}
