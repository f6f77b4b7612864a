//! tablectl-server: HTTP API over the restaurant document store
//!
//! Exposes orders, reservations and stats per restaurant. The store sits
//! behind [`store::DocumentStore`] so handlers run against MongoDB in
//! production and an in-memory store in tests.

pub mod http;
pub mod store;

pub use http::{build_router, run_server, AppState, CorsPolicy, ServerConfig, ServerError};
pub use store::{DocumentStore, MemoryStore, MongoStore, StoreError};
