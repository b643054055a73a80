// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::{
        i18n::I18nStore,
        money::{format_amount, MAX_CURRENCY_AMOUNT},
    },
    middleware::i18n::Locale,
    services::payment_engine::PaymentError,
};

// Erros de domínio/infra. Nunca vão direto para o cliente:
// os handlers convertem em ApiError (já traduzido) via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    MalformedPayload(String),

    #[error("Valor de pagamento inválido")]
    InvalidPaymentAmount,

    #[error("Valor de pagamento acima do limite")]
    PaymentAmountTooLarge,

    #[error("Conta não encontrada: {0}")]
    AccountNotFound(String),

    #[error("Empréstimo já quitado")]
    LoanAlreadySettled,

    #[error("Conta alterada por outro pagamento durante a requisição")]
    ConcurrentPayment,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidPayment => AppError::InvalidPaymentAmount,
            PaymentError::LoanAlreadySettled => AppError::LoanAlreadySettled,
        }
    }
}

// O erro que efetivamente vira resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.error,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedPayload(_)
            | AppError::InvalidPaymentAmount
            | AppError::PaymentAmountTooLarge
            | AppError::LoanAlreadySettled => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConcurrentPayment => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código estável enviado ao cliente no campo `error`.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedPayload(_)
            | AppError::InvalidPaymentAmount
            | AppError::PaymentAmountTooLarge => "VALIDATION_ERROR",
            AppError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AppError::LoanAlreadySettled => "LOAN_ALREADY_SETTLED",
            AppError::ConcurrentPayment => "CONCURRENT_PAYMENT",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n_store: &I18nStore) -> ApiError {
        let lang = locale.lang();
        let mut details = None;

        let message = match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(key) => i18n_store.translate(lang, key, &[]),
                            None => e.code.to_string(),
                        })
                        .map(Value::String)
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                details = Some(Value::Object(fields));
                i18n_store.translate(lang, "error.validation", &[])
            }
            AppError::MalformedPayload(reason) => {
                i18n_store.translate(lang, "error.malformed_payload", &[("reason", reason.clone())])
            }
            AppError::InvalidPaymentAmount => {
                i18n_store.translate(lang, "error.invalid_payment_amount", &[])
            }
            AppError::PaymentAmountTooLarge => i18n_store.translate(
                lang,
                "error.payment_amount_too_large",
                &[("max", format_amount(MAX_CURRENCY_AMOUNT))],
            ),
            AppError::AccountNotFound(_) => i18n_store.translate(lang, "error.account_not_found", &[]),
            AppError::LoanAlreadySettled => i18n_store.translate(lang, "error.loan_already_settled", &[]),
            AppError::ConcurrentPayment => i18n_store.translate(lang, "error.concurrent_payment", &[]),
            // Detalhes de banco/infra ficam só no log.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro interno ao processar requisição: {:?}", self);
                i18n_store.translate(lang, "error.internal", &[])
            }
        };

        ApiError {
            status: self.status_code(),
            error: self.code().to_string(),
            message,
            details,
        }
    }
}
