// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::customer::CustomerDetails;

// --- Enums (Mapeando o Postgres) ---

// Só existe um status: pagamentos parciais/pendentes não são modelados.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Completed,
}

// --- Structs ---

// Linha da tabela `payments`. Imutável depois de inserida.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = 5000.0)]
    pub payment_amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

// Pagamento + número da conta (JOIN com customers), usado no histórico.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "ACC001")]
    pub account_number: String,
    #[schema(example = 5000.0)]
    pub payment_amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

// --- Respostas ---

/// `data` de POST /api/payments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentConfirmation {
    pub payment_id: Uuid,
    #[schema(example = "ACC001")]
    pub account_number: String,
    #[schema(example = 20000.0)]
    pub payment_amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    /// Meses quitados por este pagamento.
    #[schema(example = 1)]
    pub months_paid: u32,
    #[schema(example = 10000.0)]
    pub remaining_emi: Decimal,
    #[schema(example = 1)]
    pub remaining_tenure: u32,
    /// `remaining_emi` se ainda há prazo, senão 0.
    #[schema(example = 10000.0)]
    pub next_emi_due: Decimal,
}

/// `data` de GET /api/payments/{account_number}
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentHistoryView {
    pub account_number: String,
    pub customer_details: CustomerDetails,
    /// Mais recente primeiro.
    pub payment_history: Vec<PaymentRecord>,
    pub total_payments: usize,
}
