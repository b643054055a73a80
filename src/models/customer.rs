// src/models/customer.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ledger::Ledger;

// Linha da tabela `customers`, do jeito que está no banco.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub account_number: String,
    pub issue_date: NaiveDate,
    pub interest_rate: Decimal,
    pub tenure: i32,
    pub emi_due: Decimal,
    // NULL / 0 = mês intocado (ver Ledger::from_stored)
    pub remaining_emi: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn ledger(&self) -> Ledger {
        Ledger::from_stored(self.emi_due, self.remaining_emi, self.tenure)
    }
}

// --- Listagem (GET /api/customers) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerOverview {
    pub id: Uuid,

    #[schema(example = "ACC001")]
    pub account_number: String,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub issue_date: NaiveDate,

    #[schema(example = 10.5)]
    pub interest_rate: Decimal,

    #[schema(example = 12)]
    pub tenure: i32,

    #[schema(example = 15000.0)]
    pub emi_due: Decimal,

    /// Obrigação efetiva do mês pendente (nunca NULL nem 0).
    #[schema(example = 10000.0)]
    pub remaining_emi: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerOverview {
    fn from(customer: Customer) -> Self {
        let remaining_emi = customer.ledger().current_obligation();
        Self {
            id: customer.id,
            account_number: customer.account_number,
            issue_date: customer.issue_date,
            interest_rate: customer.interest_rate,
            tenure: customer.tenure,
            emi_due: customer.emi_due,
            remaining_emi,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

// --- Resumo usado no histórico de pagamentos ---

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDetails {
    pub account_number: String,
    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub issue_date: NaiveDate,
    pub interest_rate: Decimal,
    pub tenure: i32,
    pub emi_due: Decimal,
}

impl From<&Customer> for CustomerDetails {
    fn from(customer: &Customer) -> Self {
        Self {
            account_number: customer.account_number.clone(),
            issue_date: customer.issue_date,
            interest_rate: customer.interest_rate,
            tenure: customer.tenure,
            emi_due: customer.emi_due,
        }
    }
}
