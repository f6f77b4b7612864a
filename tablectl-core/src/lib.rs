//! tablectl-core: domain types for the restaurant orders backend
//!
//! Pure logic only. Store access and HTTP live in tablectl-server.

pub mod config;
pub mod error;
pub mod order;
pub mod restaurant;
pub mod stats;

pub use config::ServiceConfig;
pub use error::{Result, TableError};
pub use order::{Order, OrderBuilder, OrderDraft, PhoneSource};
pub use restaurant::{DatabaseName, Restaurant};
pub use stats::{OrderStats, Revenue};
