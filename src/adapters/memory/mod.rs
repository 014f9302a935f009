//! In-memory adapters.
//!
//! - **RevenueSnapshot** - The immutable data set, loadable from JSON exports
//! - **InMemoryRevenueReader** - `RevenueReader` over a snapshot
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::memory::{InMemoryRevenueReader, RevenueSnapshot};
//!
//! let snapshot = RevenueSnapshot::load_dir("./data").await?;
//! let reader = InMemoryRevenueReader::new(snapshot);
//! ```

mod reader;
mod snapshot;

pub use reader::InMemoryRevenueReader;
pub use snapshot::{RevenueSnapshot, SnapshotError};
