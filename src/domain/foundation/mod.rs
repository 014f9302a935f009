//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the revenue analytics domain.

mod errors;
mod ids;
mod year_month;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, ActivityId, DealId, RepId};
pub use year_month::YearMonth;
