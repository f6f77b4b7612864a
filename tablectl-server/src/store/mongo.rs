//! MongoDB backend
//!
//! One client per process, created at startup. Database handles are cached
//! per resolved name on first use and never evicted; collection handles are
//! rebuilt per call since the driver makes them cheap.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use tablectl_core::config::StoreConfig;
use tablectl_core::{DatabaseName, Order};

use super::convert::document_to_json;
use super::{CollectionName, DocumentStore, OrderFilter, StoreResult};

/// Handles to the two collections of one restaurant database
#[derive(Debug, Clone)]
pub struct Collections {
    pub orders: Collection<Document>,
    pub reservations: Collection<Document>,
}

impl Collections {
    fn get(&self, name: CollectionName) -> &Collection<Document> {
        match name {
            CollectionName::Orders => &self.orders,
            CollectionName::Reservations => &self.reservations,
        }
    }
}

/// MongoDB-backed [`DocumentStore`]
pub struct MongoStore {
    client: Client,
    databases: RwLock<HashMap<DatabaseName, Database>>,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    ///
    /// The driver connects lazily, so the ping is what surfaces an
    /// unreachable server within `connect_timeout_ms`.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client without pinging it
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            databases: RwLock::new(HashMap::new()),
        }
    }

    /// Cached database handle for `name`, created on first use.
    pub async fn database(&self, name: DatabaseName) -> Database {
        if let Some(db) = self.databases.read().await.get(&name) {
            return db.clone();
        }

        let mut cache = self.databases.write().await;
        cache
            .entry(name)
            .or_insert_with(|| {
                debug!(database = %name, "Caching database handle");
                self.client.database(name.as_str())
            })
            .clone()
    }

    pub async fn collections(&self, name: DatabaseName) -> Collections {
        let db = self.database(name).await;
        Collections {
            orders: db.collection(CollectionName::Orders.as_str()),
            reservations: db.collection(CollectionName::Reservations.as_str()),
        }
    }

    /// Number of database handles created so far
    pub async fn cached_databases(&self) -> usize {
        self.databases.read().await.len()
    }
}

fn order_filter(filter: &OrderFilter) -> Document {
    match filter {
        OrderFilter::All => doc! {},
        OrderFilter::ItemStatus(status) => doc! { "items.status": status.as_str() },
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list(&self, db: DatabaseName, collection: CollectionName) -> StoreResult<Vec<Value>> {
        let collections = self.collections(db).await;
        let docs: Vec<Document> = collections
            .get(collection)
            .find(doc! {})
            .projection(doc! { "_id": 0 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn count_orders(&self, db: DatabaseName, filter: &OrderFilter) -> StoreResult<u64> {
        let collections = self.collections(db).await;
        let count = collections
            .orders
            .count_documents(order_filter(filter))
            .await?;
        Ok(count)
    }

    async fn insert_order(&self, db: DatabaseName, order: &Order) -> StoreResult<()> {
        let document = mongodb::bson::to_document(order)?;
        let collections = self.collections(db).await;
        let result = collections.orders.insert_one(document).await?;
        debug!(database = %db, id = %result.inserted_id, "Inserted order");
        Ok(())
    }

    async fn latest_order(&self, db: DatabaseName, phone: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections(db).await;
        let found = collections
            .orders
            .find_one(doc! { "phone": phone })
            .sort(doc! { "_id": -1 })
            .await?;
        Ok(found.map(document_to_json))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
