// src/services/payment_service.rs

use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        money::{round_currency, MAX_CURRENCY_AMOUNT},
    },
    db::{DynLoanRepository, LedgerUpdate, NewPayment},
    models::{
        customer::{Customer, CustomerDetails},
        payment::{Payment, PaymentConfirmation, PaymentHistoryView, PaymentRecord, PaymentStatus},
    },
    services::payment_engine::{self, PaymentApplication},
};

#[derive(Clone)]
pub struct PaymentService {
    repo: DynLoanRepository,
}

/// Resultado de um pagamento gravado. Traz tudo o que a resposta precisa,
/// sem reler o banco.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub account_number: String,
    pub payment: Payment,
    pub application: PaymentApplication,
}

impl PaymentReceipt {
    pub fn confirmation(&self) -> PaymentConfirmation {
        PaymentConfirmation {
            payment_id: self.payment.id,
            account_number: self.account_number.clone(),
            payment_amount: self.payment.payment_amount,
            payment_date: self.payment.payment_date,
            status: self.payment.status,
            months_paid: self.application.months_settled,
            remaining_emi: self.application.remaining_emi(),
            remaining_tenure: self.application.tenure(),
            next_emi_due: self.application.next_emi_due(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentHistory {
    pub customer: Customer,
    pub payments: Vec<PaymentRecord>,
}

impl PaymentHistory {
    pub fn into_view(self) -> PaymentHistoryView {
        PaymentHistoryView {
            account_number: self.customer.account_number.clone(),
            customer_details: CustomerDetails::from(&self.customer),
            total_payments: self.payments.len(),
            payment_history: self.payments,
        }
    }
}

impl PaymentService {
    pub fn new(repo: DynLoanRepository) -> Self {
        Self { repo }
    }

    /// Lê a conta, aplica o pagamento e grava ledger + histórico numa transação.
    /// Erros de validação/negócio acontecem antes de qualquer escrita.
    pub async fn submit_payment(
        &self,
        account_number: &str,
        payment_amount: Decimal,
    ) -> Result<PaymentReceipt, AppError> {
        let amount = round_currency(payment_amount);
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount);
        }
        if amount > MAX_CURRENCY_AMOUNT {
            return Err(AppError::PaymentAmountTooLarge);
        }

        let customer = self.find_customer(account_number).await?;
        let ledger = customer.ledger();

        let application = payment_engine::apply_payment(&ledger, amount).map_err(|e| {
            tracing::warn!(account_number, amount = %amount, "Pagamento recusado: {}", e);
            AppError::from(e)
        })?;

        let update = LedgerUpdate {
            customer_id: customer.id,
            expected_remaining_emi: customer.remaining_emi,
            expected_tenure: customer.tenure,
            remaining_emi: application.ledger.stored_remaining_emi(),
            tenure: application.ledger.stored_tenure(),
        };
        let new_payment = NewPayment {
            customer_id: customer.id,
            payment_amount: amount,
            status: PaymentStatus::Completed,
        };

        let payment = self.repo.commit_payment(update, new_payment).await?;

        tracing::info!(
            account_number,
            amount = %amount,
            months_settled = application.months_settled,
            remaining_emi = %application.remaining_emi(),
            tenure = application.tenure(),
            "Pagamento aplicado"
        );

        Ok(PaymentReceipt {
            account_number: customer.account_number,
            payment,
            application,
        })
    }

    pub async fn payment_history(&self, account_number: &str) -> Result<PaymentHistory, AppError> {
        let customer = self.find_customer(account_number).await?;
        let payments = self.repo.list_payments(&customer.account_number).await?;

        Ok(PaymentHistory { customer, payments })
    }

    async fn find_customer(&self, account_number: &str) -> Result<Customer, AppError> {
        self.repo
            .find_by_account_number(account_number)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }
}
