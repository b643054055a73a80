// src/services/customer_service.rs

use crate::{
    common::error::AppError,
    db::DynLoanRepository,
    models::customer::CustomerOverview,
};

#[derive(Clone)]
pub struct CustomerService {
    repo: DynLoanRepository,
}

impl CustomerService {
    pub fn new(repo: DynLoanRepository) -> Self {
        Self { repo }
    }

    pub async fn list_customers(&self) -> Result<Vec<CustomerOverview>, AppError> {
        let customers = self.repo.list_customers().await?;
        Ok(customers.into_iter().map(CustomerOverview::from).collect())
    }
}
