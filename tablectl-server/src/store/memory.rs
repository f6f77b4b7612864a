//! In-memory backend
//!
//! Keeps documents per (database, collection) in insertion order. Used by the
//! router tests and handy for running the server without MongoDB.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use tablectl_core::stats::items_have_status;
use tablectl_core::{DatabaseName, Order};

use super::{CollectionName, DocumentStore, OrderFilter, StoreError, StoreResult};

const ID_FIELD: &str = "_id";

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    id: String,
    body: Map<String, Value>,
}

impl StoredDocument {
    fn with_id(&self) -> Value {
        let mut out = Map::with_capacity(self.body.len() + 1);
        out.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        out.extend(self.body.clone());
        Value::Object(out)
    }
}

#[derive(Default)]
struct Collections {
    next_seq: u64,
    documents: HashMap<(DatabaseName, CollectionName), Vec<StoredDocument>>,
}

/// In-memory [`DocumentStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Insert a raw document, e.g. a reservation written by another system.
    ///
    /// Non-object values are wrapped as `{"value": ...}`. A supplied `_id`
    /// is replaced by a generated one.
    pub async fn insert_document(&self, db: DatabaseName, collection: CollectionName, doc: Value) {
        let body = match doc {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.push(db, collection, body).await;
    }

    /// Number of documents in a collection
    pub async fn len(&self, db: DatabaseName, collection: CollectionName) -> usize {
        self.inner
            .read()
            .await
            .documents
            .get(&(db, collection))
            .map_or(0, Vec::len)
    }

    async fn push(&self, db: DatabaseName, collection: CollectionName, mut body: Map<String, Value>) {
        body.remove(ID_FIELD);
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner
            .documents
            .entry((db, collection))
            .or_default()
            .push(StoredDocument {
                seq,
                id: uuid::Uuid::new_v4().simple().to_string(),
                body,
            });
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store set to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, db: DatabaseName, collection: CollectionName) -> StoreResult<Vec<Value>> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .get(&(db, collection))
            .map(|docs| docs.iter().map(|d| Value::Object(d.body.clone())).collect())
            .unwrap_or_default())
    }

    async fn count_orders(&self, db: DatabaseName, filter: &OrderFilter) -> StoreResult<u64> {
        self.check()?;
        let inner = self.inner.read().await;
        let Some(orders) = inner.documents.get(&(db, CollectionName::Orders)) else {
            return Ok(0);
        };
        let count = match filter {
            OrderFilter::All => orders.len(),
            OrderFilter::ItemStatus(status) => orders
                .iter()
                .filter(|d| items_have_status(d.body.get("items"), status))
                .count(),
        };
        Ok(count as u64)
    }

    async fn insert_order(&self, db: DatabaseName, order: &Order) -> StoreResult<()> {
        self.check()?;
        let body = match serde_json::to_value(order)? {
            Value::Object(map) => map,
            _ => return Err(StoreError::Unavailable("order did not encode as an object".into())),
        };
        self.push(db, CollectionName::Orders, body).await;
        Ok(())
    }

    async fn latest_order(&self, db: DatabaseName, phone: &str) -> StoreResult<Option<Value>> {
        self.check()?;
        let inner = self.inner.read().await;
        let latest = inner
            .documents
            .get(&(db, CollectionName::Orders))
            .and_then(|orders| {
                orders
                    .iter()
                    .filter(|d| d.body.get("phone").and_then(Value::as_str) == Some(phone))
                    .max_by_key(|d| d.seq)
            });
        Ok(latest.map(StoredDocument::with_id))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DB: DatabaseName = DatabaseName::BansariRestaurant;

    #[tokio::test]
    async fn databases_are_isolated() {
        let store = MemoryStore::new();
        store
            .insert_document(DatabaseName::Bhawarchi, CollectionName::Orders, json!({"phone": "1"}))
            .await;

        assert_eq!(store.list(DB, CollectionName::Orders).await.unwrap().len(), 0);
        assert_eq!(
            store
                .list(DatabaseName::Bhawarchi, CollectionName::Orders)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn list_hides_internal_id() {
        let store = MemoryStore::new();
        store
            .insert_document(DB, CollectionName::Reservations, json!({"_id": "abc", "party": 4}))
            .await;

        let docs = store.list(DB, CollectionName::Reservations).await.unwrap();
        assert_eq!(docs, vec![json!({"party": 4})]);
    }

    #[tokio::test]
    async fn latest_is_last_inserted_regardless_of_created_at() {
        let store = MemoryStore::new();
        for (n, created_at) in [
            (1, "2026-10-19T08:00:00.000Z"),
            (2, "2026-10-20T01:00:00+05:30"),
            (3, "2026-10-19T20:00:00.000Z"),
        ] {
            store
                .insert_document(
                    DB,
                    CollectionName::Orders,
                    json!({"phone": "555", "n": n, "created_at": created_at}),
                )
                .await;
        }

        let latest = store.latest_order(DB, "555").await.unwrap().unwrap();
        assert_eq!(latest["n"], 3);
        assert!(latest["_id"].is_string());
        assert!(store.latest_order(DB, "556").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn counts_by_item_status() {
        let store = MemoryStore::new();
        for items in [
            json!([{"status": "confirmed"}]),
            json!([{"status": "delivered"}]),
            json!([]),
        ] {
            store
                .insert_document(DB, CollectionName::Orders, json!({"items": items}))
                .await;
        }

        let delivered = OrderFilter::ItemStatus("delivered".into());
        assert_eq!(store.count_orders(DB, &OrderFilter::All).await.unwrap(), 3);
        assert_eq!(store.count_orders(DB, &delivered).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failing_mode_errors_every_call() {
        let store = MemoryStore::new();
        store.set_failing(true);

        assert!(store.ping().await.is_err());
        assert!(store.list(DB, CollectionName::Orders).await.is_err());
        assert!(store.latest_order(DB, "1").await.is_err());

        store.set_failing(false);
        assert!(store.ping().await.is_ok());
    }
}
