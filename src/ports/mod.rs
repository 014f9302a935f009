//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RevenueReader` - Read-only queries over accounts, reps, deals,
//!   activities and monthly targets

mod revenue_reader;

pub use revenue_reader::{RevenueReadError, RevenueReader};
