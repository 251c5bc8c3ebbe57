//! Validation pipeline
//!
//! Every mutating operation is gated behind an ordered list of independent
//! [`Check`]s. A [`Pipeline`] runs them in sequence and stops at the first
//! failure, whose classified [`OrderError`] becomes the response. Because
//! messages differ per check, the order of the list is part of the API.
//!
//! ```rust,ignore
//! let pipeline = Pipeline::for_update(store.clone());
//! let mut ctx = CheckContext::new(&payload).with_route_id("7");
//! pipeline.run(&mut ctx).await?;
//! let order = ctx.into_record();
//! ```

pub mod checks;
pub mod extractor;

pub use checks::{
    DishQuantitiesValid, DishesNonEmpty, PendingForDelete, RecordExists, RequiredField,
    RouteIdMatchesBody, StatusAssignable,
};
pub use extractor::OrderPayload;

use crate::core::error::OrderResult;
use crate::core::order::Order;
use crate::core::store::OrderStore;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Everything a check may look at for one request
///
/// The record resolved by [`RecordExists`] is stored here and handed to the
/// later checks and to the mutation explicitly, never through ambient state.
#[derive(Debug)]
pub struct CheckContext<'a> {
    /// The `data` object of the request body
    pub payload: &'a Value,

    /// The `{orderId}` segment of the route, for routes that carry one
    pub route_id: Option<&'a str>,

    /// The stored order, once resolved
    pub record: Option<Order>,
}

impl<'a> CheckContext<'a> {
    pub fn new(payload: &'a Value) -> Self {
        Self {
            payload,
            route_id: None,
            record: None,
        }
    }

    pub fn with_route_id(mut self, route_id: &'a str) -> Self {
        self.route_id = Some(route_id);
        self
    }

    /// Field of the payload, if the payload is an object that has it
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.payload.get(name)
    }

    pub fn into_record(self) -> Option<Order> {
        self.record
    }
}

/// A single gate in a pipeline
#[async_trait]
pub trait Check: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pass (`Ok`) or fail with the classified error for this check
    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()>;
}

/// An ordered chain of checks for one operation
pub struct Pipeline {
    operation: &'static str,
    checks: Vec<Box<dyn Check>>,
}

impl Pipeline {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            checks: Vec::new(),
        }
    }

    /// Append a check to the end of the chain
    pub fn then(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the checks, in the order they run
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check in order; the first failure wins
    pub async fn run(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        for check in &self.checks {
            if let Err(err) = check.check(ctx).await {
                tracing::debug!(
                    operation = self.operation,
                    check = check.name(),
                    code = err.error_code(),
                    "check failed: {}",
                    err
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Checks gating order creation
    pub fn for_create() -> Self {
        Self::new("create")
            .then(DishesNonEmpty)
            .then(DishQuantitiesValid)
            .then(RequiredField::new("deliverTo"))
            .then(RequiredField::new("mobileNumber"))
            .then(RequiredField::new("dishes"))
    }

    /// Checks gating a single-order read
    pub fn for_read(store: Arc<dyn OrderStore>) -> Self {
        Self::new("read").then(RecordExists::new(store))
    }

    /// Checks gating an order update
    pub fn for_update(store: Arc<dyn OrderStore>) -> Self {
        Self::new("update")
            .then(RecordExists::new(store))
            .then(RouteIdMatchesBody)
            .then(DishesNonEmpty)
            .then(DishQuantitiesValid)
            .then(StatusAssignable)
            .then(RequiredField::new("deliverTo"))
            .then(RequiredField::new("mobileNumber"))
            .then(RequiredField::new("dishes"))
    }

    /// Checks gating an order deletion
    pub fn for_delete(store: Arc<dyn OrderStore>) -> Self {
        Self::new("delete")
            .then(RecordExists::new(store))
            .then(PendingForDelete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OrderError;
    use crate::storage::InMemoryOrderStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Check for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn check(&self, _ctx: &mut CheckContext<'_>) -> OrderResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(OrderError::validation("stop"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_first_failure_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new("test")
            .then(Counting { calls: calls.clone(), fail: false })
            .then(Counting { calls: calls.clone(), fail: true })
            .then(Counting { calls: calls.clone(), fail: false });

        let payload = json!({});
        let mut ctx = CheckContext::new(&payload);
        let err = pipeline.run(&mut ctx).await.unwrap_err();

        assert_eq!(err.to_string(), "stop");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_pipeline_passes() {
        let payload = json!({});
        let mut ctx = CheckContext::new(&payload);
        assert!(Pipeline::new("noop").run(&mut ctx).await.is_ok());
    }

    #[test]
    fn test_create_chain_order() {
        assert_eq!(
            Pipeline::for_create().check_names(),
            vec![
                "dishes_non_empty",
                "dish_quantities_valid",
                "required_field",
                "required_field",
                "required_field",
            ]
        );
    }

    #[test]
    fn test_update_chain_order() {
        let store: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
        assert_eq!(
            Pipeline::for_update(store).check_names(),
            vec![
                "record_exists",
                "route_id_matches_body",
                "dishes_non_empty",
                "dish_quantities_valid",
                "status_assignable",
                "required_field",
                "required_field",
                "required_field",
            ]
        );
    }

    #[test]
    fn test_delete_and_read_chains() {
        let store: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
        assert_eq!(
            Pipeline::for_delete(store.clone()).check_names(),
            vec!["record_exists", "pending_for_delete"]
        );
        assert_eq!(Pipeline::for_read(store).check_names(), vec!["record_exists"]);
    }

    #[tokio::test]
    async fn test_create_reports_dishes_before_missing_fields() {
        let payload = json!({ "dishes": [] });
        let mut ctx = CheckContext::new(&payload);
        let err = Pipeline::for_create().run(&mut ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "Order must include at least one dish");
    }

    #[tokio::test]
    async fn test_update_missing_record_wins_over_bad_payload() {
        let store: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
        let payload = json!({ "id": "5" });
        let mut ctx = CheckContext::new(&payload).with_route_id("7");
        let err = Pipeline::for_update(store).run(&mut ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "Order does not exist: 7");
    }
}
