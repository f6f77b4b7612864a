//! Restaurant identifiers and database resolution
//!
//! Callers pick a restaurant with a free-text label. Every label resolves to
//! exactly one of two databases; unknown labels fall through to the default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used when the caller does not name a restaurant
pub const DEFAULT_RESTAURANT: &str = "bansari";

/// Collection holding order documents
pub const ORDERS_COLLECTION: &str = "orders";

/// Collection holding reservation documents
pub const RESERVATIONS_COLLECTION: &str = "reservations";

/// Logical database backing one restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseName {
    /// Dedicated database for the "bhawarchi" restaurant
    Bhawarchi,
    /// Default database for everything else
    BansariRestaurant,
}

impl DatabaseName {
    /// Resolve a restaurant label to its database.
    ///
    /// Comparison is case-insensitive. Total: empty and unknown labels map to
    /// [`DatabaseName::BansariRestaurant`].
    pub fn resolve(identifier: &str) -> Self {
        if identifier.eq_ignore_ascii_case("bhawarchi") {
            Self::Bhawarchi
        } else {
            Self::BansariRestaurant
        }
    }

    /// Database name as known to the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bhawarchi => "bhawarchi",
            Self::BansariRestaurant => "Bansari_Restaurant",
        }
    }
}

impl Default for DatabaseName {
    fn default() -> Self {
        Self::BansariRestaurant
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restaurant label exactly as the caller supplied it.
///
/// Kept verbatim so it can be echoed back (stats responses do this);
/// use [`Restaurant::database`] for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restaurant(String);

impl Restaurant {
    /// Build from an optional query value. Missing or empty means default.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(label) if !label.is_empty() => Self(label.to_owned()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn database(&self) -> DatabaseName {
        DatabaseName::resolve(&self.0)
    }
}

impl Default for Restaurant {
    fn default() -> Self {
        Self(DEFAULT_RESTAURANT.to_owned())
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
