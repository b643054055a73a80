pub mod customer;
pub mod ledger;
pub mod payment;
