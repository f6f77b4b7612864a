//! Route handlers organized by resource

pub mod health;
pub mod orders;
pub mod reservations;
pub mod stats;
