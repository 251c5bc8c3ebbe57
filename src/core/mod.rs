//! Core module: the order entity, its status rules, storage traits and the
//! validation pipeline

pub mod error;
pub mod order;
pub mod status;
pub mod store;
pub mod validation;

pub use error::{OrderError, OrderResult};
pub use order::{DishLine, Order, OrderDraft, OrderStatus};
pub use status::StatusGuard;
pub use store::{IdAllocator, OrderStore, SequentialIdAllocator, UuidIdAllocator};
pub use validation::{Check, CheckContext, OrderPayload, Pipeline};
