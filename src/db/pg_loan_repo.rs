// src/db/pg_loan_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::loan_repo::{LedgerUpdate, LoanRepository, NewPayment},
    models::{
        customer::Customer,
        payment::{Payment, PaymentRecord},
    },
};

const CUSTOMER_COLUMNS: &str = r#"
    id, account_number, issue_date, interest_rate, tenure,
    emi_due, remaining_emi, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgLoanRepository {
    pool: PgPool,
}

impl PgLoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Escritas (rodam dentro da transação de commit_payment)
    // ---

    /// UPDATE condicional: só grava se tenure/remaining_emi ainda forem os lidos.
    /// Retorna `false` quando outra requisição chegou antes.
    async fn update_ledger<'e, E>(&self, executor: E, update: &LedgerUpdate) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET remaining_emi = $1, tenure = $2, updated_at = NOW()
            WHERE id = $3
              AND tenure = $4
              AND remaining_emi IS NOT DISTINCT FROM $5
            "#,
        )
            .bind(update.remaining_emi)
            .bind(update.tenure)
            .bind(update.customer_id)
            .bind(update.expected_tenure)
            .bind(update.expected_remaining_emi)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_payment<'e, E>(&self, executor: E, payment: &NewPayment) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (customer_id, payment_date, payment_amount, status)
            VALUES ($1, NOW(), $2, $3)
            RETURNING id, customer_id, payment_amount, payment_date, status, created_at
            "#,
        )
            .bind(payment.customer_id)
            .bind(payment.payment_amount)
            .bind(payment.status)
            .fetch_one(executor)
            .await?;

        Ok(payment)
    }
}

#[async_trait]
impl LoanRepository for PgLoanRepository {
    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers WHERE account_number = $1",
            CUSTOMER_COLUMNS
        ))
            .bind(account_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers ORDER BY account_number ASC",
            CUSTOMER_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn list_payments(&self, account_number: &str) -> Result<Vec<PaymentRecord>, AppError> {
        let payments = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT
                p.id, p.customer_id, c.account_number,
                p.payment_amount, p.payment_date, p.status, p.created_at
            FROM payments p
            INNER JOIN customers c ON p.customer_id = c.id
            WHERE c.account_number = $1
            ORDER BY p.payment_date DESC, p.created_at DESC
            "#,
        )
            .bind(account_number)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    async fn commit_payment(&self, update: LedgerUpdate, payment: NewPayment) -> Result<Payment, AppError> {
        // Se qualquer `?` abaixo retornar, o Drop da transação faz o rollback.
        let mut tx = self.pool.begin().await?;

        if !self.update_ledger(&mut *tx, &update).await? {
            tx.rollback().await?;
            return Err(AppError::ConcurrentPayment);
        }

        let payment = self.insert_payment(&mut *tx, &payment).await?;

        tx.commit().await?;
        Ok(payment)
    }
}
