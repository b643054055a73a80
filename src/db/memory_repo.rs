// src/db/memory_repo.rs

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::loan_repo::{LedgerUpdate, LoanRepository, NewPayment},
    models::{
        customer::Customer,
        payment::{Payment, PaymentRecord},
    },
};

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    payments: Vec<Payment>,
}

/// Repositório em memória para os testes de serviço e handler.
/// Um único `RwLock` cobre as duas "tabelas", então `commit_payment` é atômico.
#[derive(Default, Clone)]
pub struct InMemoryLoanRepository {
    tables: Arc<RwLock<Tables>>,
    fail_payment_insert: Arc<AtomicBool>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(
        &self,
        account_number: &str,
        emi_due: Decimal,
        remaining_emi: Option<Decimal>,
        tenure: i32,
    ) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            account_number: account_number.to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
            interest_rate: Decimal::new(105, 1),
            tenure,
            emi_due,
            remaining_emi,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.customers.push(customer.clone());
        customer
    }

    pub async fn customer(&self, account_number: &str) -> Option<Customer> {
        self.tables
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.account_number == account_number)
            .cloned()
    }

    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }

    /// Simula falha do banco no INSERT do pagamento. O UPDATE do ledger já
    /// foi aplicado nesse ponto e é desfeito, como no rollback da transação.
    pub fn fail_payment_inserts(&self, fail: bool) {
        self.fail_payment_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.customer(account_number).await)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let mut customers = self.tables.read().await.customers.clone();
        customers.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Ok(customers)
    }

    async fn list_payments(&self, account_number: &str) -> Result<Vec<PaymentRecord>, AppError> {
        let tables = self.tables.read().await;
        let Some(customer) = tables.customers.iter().find(|c| c.account_number == account_number) else {
            return Ok(Vec::new());
        };

        let mut records: Vec<PaymentRecord> = tables
            .payments
            .iter()
            .filter(|p| p.customer_id == customer.id)
            .map(|p| PaymentRecord {
                id: p.id,
                customer_id: p.customer_id,
                account_number: customer.account_number.clone(),
                payment_amount: p.payment_amount,
                payment_date: p.payment_date,
                status: p.status,
                created_at: p.created_at,
            })
            .collect();
        records.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(records)
    }

    async fn commit_payment(&self, update: LedgerUpdate, payment: NewPayment) -> Result<Payment, AppError> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.customers.iter().position(|c| c.id == update.customer_id) else {
            return Err(AppError::ConcurrentPayment);
        };

        let current = &tables.customers[index];
        if current.tenure != update.expected_tenure
            || current.remaining_emi != update.expected_remaining_emi
        {
            return Err(AppError::ConcurrentPayment);
        }

        // Datas estritamente crescentes para o ORDER BY do histórico.
        let now = tables
            .payments
            .last()
            .map(|last| (last.payment_date + Duration::milliseconds(1)).max(Utc::now()))
            .unwrap_or_else(Utc::now);

        // 1. UPDATE do ledger (guardando a linha anterior para o rollback)
        let snapshot = tables.customers[index].clone();
        let customer = &mut tables.customers[index];
        customer.remaining_emi = Some(update.remaining_emi);
        customer.tenure = update.tenure;
        customer.updated_at = now;

        // 2. INSERT do pagamento
        if self.fail_payment_insert.load(Ordering::SeqCst) {
            tables.customers[index] = snapshot;
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "falha simulada no insert de pagamento"
            )));
        }

        let stored = Payment {
            id: Uuid::new_v4(),
            customer_id: payment.customer_id,
            payment_amount: payment.payment_amount,
            payment_date: now,
            status: payment.status,
            created_at: now,
        };
        tables.payments.push(stored.clone());
        Ok(stored)
    }
}
