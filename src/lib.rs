//! Revenue Intel - Quarterly revenue analytics
//!
//! This crate computes four read-only views over a snapshot of accounts,
//! reps, deals, activities and monthly targets: revenue against target,
//! pipeline drivers, risk factors and ranked recommendations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
