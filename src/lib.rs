//! Loan servicing backend: accounts with per-device refresh sessions, loan
//! applications with an admin approval workflow, and an audit log written
//! alongside every loan operation.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
