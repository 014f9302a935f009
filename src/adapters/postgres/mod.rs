//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresRevenueReader` - Aggregate and listing queries over the
//!   deals/accounts/reps/activities/targets schema in `migrations/`

mod revenue_reader;

pub use revenue_reader::PostgresRevenueReader;
