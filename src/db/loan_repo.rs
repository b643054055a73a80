// src/db/loan_repo.rs

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        customer::Customer,
        payment::{Payment, PaymentRecord, PaymentStatus},
    },
};

/// Nova posição do ledger + os valores lidos no início da requisição.
/// A escrita só acontece se o banco ainda tiver os valores `expected_*`.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpdate {
    pub customer_id: Uuid,
    pub expected_remaining_emi: Option<Decimal>,
    pub expected_tenure: i32,
    pub remaining_emi: Decimal,
    pub tenure: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub customer_id: Uuid,
    pub payment_amount: Decimal,
    pub status: PaymentStatus,
}

/// Tudo o que o domínio precisa do armazenamento.
/// Cada motor de banco implementa isto uma vez; os serviços não sabem qual é.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<Customer>, AppError>;

    /// Todas as contas, ordenadas por número da conta.
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;

    /// Pagamentos da conta, mais recente primeiro.
    async fn list_payments(&self, account_number: &str) -> Result<Vec<PaymentRecord>, AppError>;

    /// Atualiza o ledger e insere o pagamento numa única transação.
    /// Se o ledger mudou desde a leitura, nada é gravado e retorna
    /// `AppError::ConcurrentPayment`.
    async fn commit_payment(&self, update: LedgerUpdate, payment: NewPayment) -> Result<Payment, AppError>;
}

pub type DynLoanRepository = Arc<dyn LoanRepository>;
