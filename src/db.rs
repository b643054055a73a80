pub mod loan_repo;
pub use loan_repo::{DynLoanRepository, LedgerUpdate, LoanRepository, NewPayment};
pub mod pg_loan_repo;
pub use pg_loan_repo::PgLoanRepository;

#[cfg(test)]
pub mod memory_repo;
#[cfg(test)]
pub use memory_repo::InMemoryLoanRepository;
