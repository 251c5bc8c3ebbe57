//! Record store and id allocation traits
//!
//! The validation pipeline and the mutation operations only ever talk to
//! these traits, so they stay agnostic of where orders are kept.

use crate::core::order::{Order, OrderDraft};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Storage for order records
///
/// Implementations keep records in insertion order and must serialize their
/// own operations: each call is observed as a single atomic step.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Append a new record; fails if the id is already taken
    async fn append(&self, order: Order) -> Result<Order>;

    /// Look a record up by id
    async fn find(&self, id: &str) -> Result<Option<Order>>;

    /// Overwrite the mutable fields of a record in its existing slot
    ///
    /// Returns the updated record, or `None` when no record has this id.
    async fn update(&self, id: &str, draft: OrderDraft) -> Result<Option<Order>>;

    /// Remove the record with this id, keeping the order of the others
    async fn remove(&self, id: &str) -> Result<Option<Order>>;

    /// All records, in insertion order
    async fn list(&self) -> Result<Vec<Order>>;
}

/// Source of fresh order identifiers
pub trait IdAllocator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random ids: 32 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdAllocator;

impl IdAllocator for UuidIdAllocator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Monotonic decimal ids: `1`, `2`, `3`, ...
#[derive(Debug)]
pub struct SequentialIdAllocator {
    next: AtomicU64,
}

impl SequentialIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_uuid_ids_are_hex_and_distinct() {
        let allocator = UuidIdAllocator;
        let ids: HashSet<String> = (0..100).map(|_| allocator.next_id()).collect();
        assert_eq!(ids.len(), 100);
        for id in &ids {
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_sequential_ids() {
        let allocator = SequentialIdAllocator::starting_at(7);
        assert_eq!(allocator.next_id(), "7");
        assert_eq!(allocator.next_id(), "8");
    }

    #[test]
    fn test_sequential_ids_unique_across_threads() {
        let allocator = Arc::new(SequentialIdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = allocator.clone();
                std::thread::spawn(move || {
                    (0..50).map(|_| allocator.next_id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "duplicate id allocated");
            }
        }
        assert_eq!(ids.len(), 400);
    }
}
