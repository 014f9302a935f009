//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - Snapshot loaded from JSON exports, queried in process
//! - `postgres` - SQL queries over the revenue schema
//! - `http` - REST endpoints for the revenue views

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryRevenueReader, RevenueSnapshot};
pub use postgres::PostgresRevenueReader;
