pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

pub use entities::{Loan, LoanQuery};
pub use errors::LoanError;
pub use ports::LoanRepository;
pub use value_objects::{LoanId, LoanStatus, LoanTerms, StatusChange};
