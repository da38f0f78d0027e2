//! Loan use cases
//!
//! Every use case pairs its repository call with an audit entry through the
//! fan-out coordinator.

mod create_loan;
mod delete_loan;
mod list_loans;
mod update_loan_status;
mod view_loan;

pub use create_loan::{CreateLoanCommand, CreateLoanResponse, CreateLoanUseCase};
pub use delete_loan::{DeleteLoanCommand, DeleteLoanUseCase};
pub use list_loans::{ListLoansCommand, ListLoansResponse, ListLoansUseCase};
pub use update_loan_status::{
  UpdateLoanStatusCommand, UpdateLoanStatusResponse, UpdateLoanStatusUseCase,
};
pub use view_loan::{ViewLoanCommand, ViewLoanResponse, ViewLoanUseCase};
