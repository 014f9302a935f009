//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, year-month, errors)
//! - `revenue` - Revenue entities, quarter resolution, deal predicates and
//!   the pure derivations behind every view

pub mod foundation;
pub mod revenue;
