//! Shared domain types, errors and rules for Budgetra.

pub mod budget;
pub mod error;
pub mod roles;
pub mod types;
