pub mod audit;
pub mod auth;
pub mod clock;
pub mod errors;
pub mod loan;
pub mod pagination;

pub use errors::{ErrorKind, RepositoryError};
