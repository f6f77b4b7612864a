//! Document store access
//!
//! Handlers talk to [`DocumentStore`] only. [`mongo::MongoStore`] is the
//! production backend; [`memory::MemoryStore`] backs tests and local demos.
//!
//! Documents cross this seam as `serde_json::Value` because stored orders
//! and reservations carry no enforced schema.

pub mod convert;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use serde_json::Value;

use tablectl_core::restaurant::{ORDERS_COLLECTION, RESERVATIONS_COLLECTION};
use tablectl_core::{DatabaseName, Order};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// The two collections every restaurant database holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Orders,
    Reservations,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => ORDERS_COLLECTION,
            Self::Reservations => RESERVATIONS_COLLECTION,
        }
    }
}

/// Which orders to count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    /// Orders with at least one item in this status
    ItemStatus(String),
}

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("document encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the HTTP layer needs from the document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection, without the internal `_id`.
    async fn list(&self, db: DatabaseName, collection: CollectionName) -> StoreResult<Vec<Value>>;

    /// Number of orders matching `filter`.
    async fn count_orders(&self, db: DatabaseName, filter: &OrderFilter) -> StoreResult<u64>;

    /// Insert a new order.
    async fn insert_order(&self, db: DatabaseName, order: &Order) -> StoreResult<()>;

    /// Most recently inserted order for `phone`, whatever its `created_at`
    /// says. Includes `_id`.
    async fn latest_order(&self, db: DatabaseName, phone: &str) -> StoreResult<Option<Value>>;

    /// Round trip to the backend.
    async fn ping(&self) -> StoreResult<()>;
}
