//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Mutating loan and audit use cases pair
//! their primary write with an audit entry through [`fan_out`].

pub mod admin;
pub mod audit;
pub mod auth;
pub mod fan_out;
pub mod loan;
