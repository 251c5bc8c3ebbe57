//! The individual checks composed into order pipelines

use super::{Check, CheckContext};
use crate::core::error::{OrderError, OrderResult};
use crate::core::order::integral_quantity;
use crate::core::status::StatusGuard;
use crate::core::store::OrderStore;
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A payload value counts as given unless it is absent, `null` or `""`
fn is_given(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// A body `id` counts as given unless it is absent, `null`, `false`, zero or `""`
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

/// Render a JSON scalar the way it appears in messages: strings bare
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Check: `data[field]` is present and not an empty string
pub struct RequiredField {
    field: &'static str,
}

impl RequiredField {
    pub fn new(field: &'static str) -> Self {
        Self { field }
    }
}

#[async_trait]
impl Check for RequiredField {
    fn name(&self) -> &'static str {
        "required_field"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        if is_given(ctx.field(self.field)) {
            Ok(())
        } else {
            Err(OrderError::validation(format!(
                "Order must include a {}",
                self.field
            )))
        }
    }
}

/// Check: `dishes` is an array with at least one entry
pub struct DishesNonEmpty;

#[async_trait]
impl Check for DishesNonEmpty {
    fn name(&self) -> &'static str {
        "dishes_non_empty"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let non_empty = ctx
            .field("dishes")
            .and_then(Value::as_array)
            .is_some_and(|dishes| !dishes.is_empty());

        if non_empty {
            Ok(())
        } else {
            Err(OrderError::validation("Order must include at least one dish"))
        }
    }
}

/// Check: every dish line has a whole-number `quantity` greater than zero
///
/// Entries are scanned in order and the first offending index is reported.
/// `2.0` counts as a whole number.
pub struct DishQuantitiesValid;

impl DishQuantitiesValid {
    fn quantity_is_valid(dish: &Value) -> bool {
        match dish.get("quantity") {
            Some(Value::Number(number)) => integral_quantity(number).is_some_and(|q| q > 0),
            _ => false,
        }
    }
}

#[async_trait]
impl Check for DishQuantitiesValid {
    fn name(&self) -> &'static str {
        "dish_quantities_valid"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let Some(dishes) = ctx.field("dishes").and_then(Value::as_array) else {
            return Ok(());
        };

        match dishes.iter().position(|dish| !Self::quantity_is_valid(dish)) {
            None => Ok(()),
            Some(index) => Err(OrderError::validation(format!(
                "Dish {} must have a quantity that is an integer greater than 0",
                index
            ))),
        }
    }
}

/// Check: the route id names a stored order; resolves it into the context
pub struct RecordExists {
    store: Arc<dyn OrderStore>,
}

impl RecordExists {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Check for RecordExists {
    fn name(&self) -> &'static str {
        "record_exists"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let route_id = ctx.route_id.unwrap_or_default();

        match self.store.find(route_id).await? {
            Some(order) => {
                ctx.record = Some(order);
                Ok(())
            }
            None => Err(OrderError::not_found(format!(
                "Order does not exist: {}",
                route_id
            ))),
        }
    }
}

/// Check: a body `id`, when given, is the route id
///
/// Only a string equal to the route id matches; a numeric `7` does not match
/// route `7`.
pub struct RouteIdMatchesBody;

#[async_trait]
impl Check for RouteIdMatchesBody {
    fn name(&self) -> &'static str {
        "route_id_matches_body"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let Some(body_id) = ctx.field("id").filter(|id| is_truthy(id)) else {
            return Ok(());
        };
        let route_id = ctx.route_id.unwrap_or_default();

        if body_id.as_str() == Some(route_id) {
            Ok(())
        } else {
            Err(OrderError::validation(format!(
                "Order id does not match route id. Order: {}, Route: {}",
                display_value(body_id),
                route_id
            )))
        }
    }
}

/// Check: the incoming `status` may be assigned by an update
pub struct StatusAssignable;

#[async_trait]
impl Check for StatusAssignable {
    fn name(&self) -> &'static str {
        "status_assignable"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let current = ctx.record.as_ref().map(|order| order.status);
        StatusGuard::ensure_assignable(current, ctx.field("status")).map(|_| ())
    }
}

/// Check: the resolved order is still pending, so it may be deleted
pub struct PendingForDelete;

#[async_trait]
impl Check for PendingForDelete {
    fn name(&self) -> &'static str {
        "pending_for_delete"
    }

    async fn check(&self, ctx: &mut CheckContext<'_>) -> OrderResult<()> {
        let order = ctx
            .record
            .as_ref()
            .ok_or_else(|| anyhow!("pending check ran before the order was resolved"))?;
        StatusGuard::ensure_deletable(order.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::{DishLine, Order, OrderStatus};
    use crate::storage::InMemoryOrderStore;
    use serde_json::json;

    async fn run(check: &dyn Check, payload: &Value) -> OrderResult<()> {
        let mut ctx = CheckContext::new(payload);
        check.check(&mut ctx).await
    }

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            deliver_to: "Rualdo Tower".to_string(),
            mobile_number: "(202) 456-1111".to_string(),
            status,
            dishes: vec![DishLine::new(1)],
        }
    }

    // === RequiredField ===

    #[tokio::test]
    async fn test_required_field_present() {
        let check = RequiredField::new("deliverTo");
        assert!(run(&check, &json!({ "deliverTo": "here" })).await.is_ok());
    }

    #[tokio::test]
    async fn test_required_field_missing_empty_or_null() {
        let check = RequiredField::new("mobileNumber");
        for payload in [
            json!({}),
            json!({ "mobileNumber": "" }),
            json!({ "mobileNumber": null }),
        ] {
            let err = run(&check, &payload).await.unwrap_err();
            assert_eq!(err.to_string(), "Order must include a mobileNumber");
            assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_required_field_on_non_object_payload() {
        let check = RequiredField::new("deliverTo");
        assert!(run(&check, &json!("not an object")).await.is_err());
    }

    // === DishesNonEmpty ===

    #[tokio::test]
    async fn test_dishes_non_empty() {
        assert!(run(&DishesNonEmpty, &json!({ "dishes": [{ "quantity": 1 }] })).await.is_ok());

        for payload in [
            json!({ "dishes": [] }),
            json!({}),
            json!({ "dishes": "pasta" }),
            json!({ "dishes": {} }),
        ] {
            let err = run(&DishesNonEmpty, &payload).await.unwrap_err();
            assert_eq!(err.to_string(), "Order must include at least one dish");
        }
    }

    // === DishQuantitiesValid ===

    #[tokio::test]
    async fn test_reports_first_invalid_index() {
        let payload = json!({ "dishes": [{ "quantity": 1 }, { "quantity": -1 }, { "quantity": 2 }] });
        let err = run(&DishQuantitiesValid, &payload).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dish 1 must have a quantity that is an integer greater than 0"
        );
    }

    #[tokio::test]
    async fn test_first_of_several_invalid_entries_wins() {
        let payload = json!({ "dishes": [{ "quantity": 3 }, { "quantity": 2 }, { "quantity": 0 }, {}] });
        let err = run(&DishQuantitiesValid, &payload).await.unwrap_err();
        assert!(err.to_string().starts_with("Dish 2 "));
    }

    #[tokio::test]
    async fn test_rejects_missing_string_and_fractional_quantities() {
        for quantity in [json!(null), json!("2"), json!(1.5), json!(0), json!(0.0), json!(true)] {
            let payload = json!({ "dishes": [{ "quantity": quantity }] });
            let err = run(&DishQuantitiesValid, &payload).await.unwrap_err();
            assert!(err.to_string().starts_with("Dish 0 "));
        }
        let payload = json!({ "dishes": [{ "name": "no quantity" }] });
        assert!(run(&DishQuantitiesValid, &payload).await.is_err());
    }

    #[tokio::test]
    async fn test_valid_quantities_pass() {
        let payload = json!({ "dishes": [{ "quantity": 1 }, { "quantity": 12 }, { "quantity": 1.0 }] });
        assert!(run(&DishQuantitiesValid, &payload).await.is_ok());
    }

    // === RecordExists ===

    #[tokio::test]
    async fn test_record_exists_resolves_into_context() {
        let store = Arc::new(InMemoryOrderStore::with_orders(vec![order(
            "42",
            OrderStatus::Pending,
        )]));
        let check = RecordExists::new(store);
        let payload = json!({});
        let mut ctx = CheckContext::new(&payload).with_route_id("42");

        check.check(&mut ctx).await.unwrap();
        assert_eq!(ctx.record.map(|o| o.id), Some("42".to_string()));
    }

    #[tokio::test]
    async fn test_record_missing_is_not_found() {
        let check = RecordExists::new(Arc::new(InMemoryOrderStore::new()));
        let payload = json!({});
        let mut ctx = CheckContext::new(&payload).with_route_id("99");

        let err = check.check(&mut ctx).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Order does not exist: 99");
        assert!(ctx.record.is_none());
    }

    // === RouteIdMatchesBody ===

    #[tokio::test]
    async fn test_route_id_mismatch() {
        let payload = json!({ "id": "5" });
        let mut ctx = CheckContext::new(&payload).with_route_id("7");
        let err = RouteIdMatchesBody.check(&mut ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order id does not match route id. Order: 5, Route: 7"
        );
    }

    #[tokio::test]
    async fn test_route_id_match_or_absent() {
        for payload in [json!({ "id": "7" }), json!({}), json!({ "id": null }), json!({ "id": "" })] {
            let mut ctx = CheckContext::new(&payload).with_route_id("7");
            assert!(RouteIdMatchesBody.check(&mut ctx).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_zero_or_false_body_id_counts_as_omitted() {
        for payload in [json!({ "id": 0 }), json!({ "id": 0.0 }), json!({ "id": false })] {
            let mut ctx = CheckContext::new(&payload).with_route_id("1");
            assert!(RouteIdMatchesBody.check(&mut ctx).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_numeric_body_id_never_matches() {
        let payload = json!({ "id": 1 });
        let mut ctx = CheckContext::new(&payload).with_route_id("1");
        let err = RouteIdMatchesBody.check(&mut ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order id does not match route id. Order: 1, Route: 1"
        );
    }

    // === StatusAssignable ===

    #[tokio::test]
    async fn test_status_assignable_uses_incoming_status() {
        let payload = json!({ "status": "invalid-status" });
        let mut ctx = CheckContext::new(&payload);
        ctx.record = Some(order("1", OrderStatus::Pending));

        let err = StatusAssignable.check(&mut ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order must have a status of pending, preparing, out-for-delivery, delivered"
        );
    }

    #[tokio::test]
    async fn test_status_assignable_refuses_delivered() {
        let payload = json!({ "status": "delivered" });
        let mut ctx = CheckContext::new(&payload);
        ctx.record = Some(order("1", OrderStatus::Delivered));

        let err = StatusAssignable.check(&mut ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "A delivered order cannot be changed");
    }

    // === PendingForDelete ===

    #[tokio::test]
    async fn test_pending_for_delete_reads_stored_status() {
        // incoming payload status is irrelevant to deletion
        let payload = json!({ "status": "pending" });
        let mut ctx = CheckContext::new(&payload);
        ctx.record = Some(order("1", OrderStatus::Preparing));

        let err = PendingForDelete.check(&mut ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "An order cannot be deleted unless it is pending"
        );

        ctx.record = Some(order("1", OrderStatus::Pending));
        assert!(PendingForDelete.check(&mut ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_pending_for_delete_without_record_is_internal() {
        let payload = json!({});
        let mut ctx = CheckContext::new(&payload);
        let err = PendingForDelete.check(&mut ctx).await.unwrap_err();
        assert!(matches!(err, OrderError::Storage(_)));
    }
}
