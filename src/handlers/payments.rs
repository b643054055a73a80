// src/handlers/payments.rs

use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ApiResponse,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::payment::{PaymentConfirmation, PaymentHistoryView},
};

// ---
// Payload: CreatePayment
// ---
// As mensagens do validator são chaves do catálogo i18n.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentPayload {
    #[validate(required(message = "validation.account_number_required"))]
    #[schema(example = "ACC001")]
    pub account_number: Option<String>,

    // O app mobile às vezes manda o valor como string ("5000.00").
    #[validate(required(message = "validation.payment_amount_required"))]
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schema(value_type = Option<f64>, example = 5000.0)]
    pub payment_amount: Option<Decimal>,
}

impl CreatePaymentPayload {
    // `required` não pega string só com espaços.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        match &self.account_number {
            Some(account) if account.trim().is_empty() => {
                let mut err = ValidationError::new("required");
                err.message = Some("validation.account_number_required".into());
                Err(err)
            }
            _ => Ok(()),
        }
    }

    /// Junta a validação do derive com a manual e devolve os campos já desembrulhados.
    fn into_validated(self) -> Result<(String, Decimal), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Err(e) = self.validate_consistency() {
            errors.add("account_number", e);
        }

        match (self.account_number, self.payment_amount) {
            (Some(account), Some(amount)) if errors.is_empty() => Ok((account.trim().to_string(), amount)),
            _ => Err(errors),
        }
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawAmount::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawAmount::Text(text)) => parse_amount(text.trim())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("payment_amount is not a number: {text}"))),
        Some(RawAmount::Number(number)) => parse_amount(&number.to_string())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("payment_amount is out of range: {number}"))),
    }
}

// "1e3" também é aceito
fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

// ---
// Handler: create_payment
// ---
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    params(
        ("accept-language" = Option<String>, Header, description = "Idioma das mensagens (en, pt)")
    ),
    responses(
        (status = 201, description = "Pagamento aplicado (confirmação em `data`)", body = PaymentConfirmation),
        (status = 400, description = "Dados inválidos ou empréstimo já quitado"),
        (status = 404, description = "Conta não encontrada"),
        (status = 409, description = "Conta alterada por outro pagamento")
    )
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreatePaymentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::MalformedPayload(rejection.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let (account_number, payment_amount) = payload
        .into_validated()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let receipt = app_state
        .payment_service
        .submit_payment(&account_number, payment_amount)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = receipt
        .application
        .outcome
        .message(&app_state.i18n_store, locale.lang());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(receipt.confirmation()).with_message(message)),
    ))
}

// ---
// Handler: get_payment_history
// ---
#[utoipa::path(
    get,
    path = "/api/payments/{account_number}",
    tag = "Payments",
    params(
        ("account_number" = String, Path, description = "Número da conta"),
        ("accept-language" = Option<String>, Header, description = "Idioma das mensagens (en, pt)")
    ),
    responses(
        (status = 200, description = "Histórico de pagamentos (em `data`)", body = PaymentHistoryView),
        (status = 404, description = "Conta não encontrada")
    )
)]
pub async fn get_payment_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(account_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .payment_service
        .payment_history(account_number.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(history.into_view()))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::FromRequest,
        http::{header, Request},
        response::Response,
    };
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    use super::*;
    use crate::db::InMemoryLoanRepository;

    async fn state_with(emi_due: Decimal, remaining_emi: Option<Decimal>, tenure: i32) -> (AppState, InMemoryLoanRepository) {
        let repo = InMemoryLoanRepository::new();
        repo.add_customer("ACC001", emi_due, remaining_emi, tenure).await;
        (AppState::with_repository(Arc::new(repo.clone())), repo)
    }

    async fn read(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(state: &AppState, lang: &str, body: Value) -> (StatusCode, Value) {
        let payload: CreatePaymentPayload = serde_json::from_value(body).unwrap();
        let response = match create_payment(State(state.clone()), Locale(lang.to_string()), Ok(Json(payload))).await {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        };
        read(response).await
    }

    async fn history(state: &AppState, account: &str) -> (StatusCode, Value) {
        let response = match get_payment_history(
            State(state.clone()),
            Locale("en".to_string()),
            Path(account.to_string()),
        )
        .await
        {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        };
        read(response).await
    }

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let from_number: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "ACC001", "payment_amount": 5000.5 })).unwrap();
        let from_text: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "ACC001", "payment_amount": " 5000.50 " })).unwrap();
        let from_integer: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "ACC001", "payment_amount": 15000 })).unwrap();

        assert_eq!(from_number.payment_amount, Some(dec!(5000.5)));
        assert_eq!(from_text.payment_amount, Some(dec!(5000.50)));
        assert_eq!(from_integer.payment_amount, Some(dec!(15000)));
    }

    #[test]
    fn empty_or_missing_amount_is_absent() {
        let empty: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "ACC001", "payment_amount": "" })).unwrap();
        let missing: CreatePaymentPayload = serde_json::from_value(json!({ "account_number": "ACC001" })).unwrap();
        let null: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "ACC001", "payment_amount": null })).unwrap();

        assert_eq!(empty.payment_amount, None);
        assert_eq!(missing.payment_amount, None);
        assert_eq!(null.payment_amount, None);
    }

    #[test]
    fn non_numeric_amount_is_a_deserialization_error() {
        let result = serde_json::from_value::<CreatePaymentPayload>(
            json!({ "account_number": "ACC001", "payment_amount": "cinco mil" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_account_number_fails_validation() {
        let payload: CreatePaymentPayload =
            serde_json::from_value(json!({ "account_number": "   ", "payment_amount": 100 })).unwrap();

        let errors = payload.into_validated().unwrap_err();
        assert!(errors.field_errors().contains_key("account_number"));
    }

    #[tokio::test]
    async fn partial_payment_returns_created_with_message() {
        let (state, _repo) = state_with(dec!(15000), None, 2).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 5000 })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["message"],
            json!("Payment of ₹5,000.00 applied. Remaining EMI for current month: ₹10,000.00")
        );
        assert_eq!(body["data"]["account_number"], json!("ACC001"));
        assert_eq!(body["data"]["months_paid"], json!(0));
        assert_eq!(body["data"]["remaining_emi"], json!(10000.0));
        assert_eq!(body["data"]["remaining_tenure"], json!(2));
        assert_eq!(body["data"]["next_emi_due"], json!(10000.0));
        assert_eq!(body["data"]["status"], json!("completed"));
    }

    #[tokio::test]
    async fn overpayment_rolls_into_next_month() {
        let (state, _repo) = state_with(dec!(15000), None, 2).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": "20000" })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["months_paid"], json!(1));
        assert_eq!(body["data"]["remaining_emi"], json!(10000.0));
        assert_eq!(body["data"]["remaining_tenure"], json!(1));
        assert_eq!(
            body["message"],
            json!("Payment of ₹20,000.00 completed 1 month(s). Remaining tenure: 1 months. Remaining EMI for next month: ₹10,000.00")
        );
    }

    #[tokio::test]
    async fn final_payment_pays_off_the_loan() {
        let (state, _repo) = state_with(dec!(15000), None, 1).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 15000 })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["remaining_tenure"], json!(0));
        assert_eq!(body["data"]["next_emi_due"], json!(0.0));
        assert!(body["message"].as_str().unwrap().ends_with("Loan fully paid off!"));
    }

    #[tokio::test]
    async fn message_follows_accept_language() {
        let (state, _repo) = state_with(dec!(15000), None, 2).await;

        let (_, body) = post(&state, "pt", json!({ "account_number": "ACC001", "payment_amount": 5000 })).await;

        assert_eq!(
            body["message"],
            json!("Pagamento de ₹5,000.00 aplicado. Parcela restante do mês atual: ₹10,000.00")
        );
    }

    #[tokio::test]
    async fn missing_fields_are_reported_per_field() {
        let (state, repo) = state_with(dec!(15000), None, 2).await;

        let (status, body) = post(&state, "en", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("VALIDATION_ERROR"));
        assert_eq!(body["details"]["account_number"], json!(["Account number is required"]));
        assert_eq!(body["details"]["payment_amount"], json!(["Payment amount is required"]));
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn zero_amount_is_a_validation_error() {
        let (state, repo) = state_with(dec!(15000), None, 2).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 0 })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("VALIDATION_ERROR"));
        assert_eq!(body["message"], json!("Payment amount must be a positive number"));
        assert_eq!(repo.customer("ACC001").await.unwrap().remaining_emi, None);
    }

    #[tokio::test]
    async fn unknown_account_is_404() {
        let (state, _repo) = state_with(dec!(15000), None, 2).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC404", "payment_amount": 100 })).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("ACCOUNT_NOT_FOUND"));
    }

    #[tokio::test]
    async fn settled_loan_is_rejected() {
        let (state, repo) = state_with(dec!(15000), Some(dec!(0)), 0).await;

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 100 })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("LOAN_ALREADY_SETTLED"));
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn storage_failure_is_a_generic_500_and_rolls_back() {
        let (state, repo) = state_with(dec!(15000), None, 2).await;
        repo.fail_payment_inserts(true);

        let (status, body) = post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 100 })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("INTERNAL_ERROR"));
        assert!(!body["message"].as_str().unwrap().contains("simulada"));
        let stored = repo.customer("ACC001").await.unwrap();
        assert_eq!(stored.remaining_emi, None);
        assert_eq!(stored.tenure, 2);
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let (state, _repo) = state_with(dec!(15000), None, 2).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"account_number\": "))
            .unwrap();
        let rejection = Json::<CreatePaymentPayload>::from_request(request, &()).await;
        assert!(rejection.is_err());

        let response = match create_payment(State(state), Locale("en".to_string()), rejection).await {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        };
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("VALIDATION_ERROR"));
        assert!(body["message"].as_str().unwrap().starts_with("The request body is invalid"));
    }

    #[tokio::test]
    async fn amount_too_large_for_storage_is_a_validation_error() {
        let (state, repo) = state_with(dec!(15000), None, 2).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"account_number":"ACC001","payment_amount":1e20}"#))
            .unwrap();
        let payload = Json::<CreatePaymentPayload>::from_request(request, &()).await;

        let response = match create_payment(State(state), Locale("en".to_string()), payload).await {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        };
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("VALIDATION_ERROR"));
        assert_eq!(body["message"], json!("Payment amount cannot exceed ₹9,99,99,999.99"));
        assert_eq!(repo.payment_count().await, 0);
        assert_eq!(repo.customer("ACC001").await.unwrap().tenure, 2);
    }

    #[tokio::test]
    async fn history_lists_payments_with_customer_details() {
        let (state, _repo) = state_with(dec!(15000), None, 3).await;
        post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 1000 })).await;
        post(&state, "en", json!({ "account_number": "ACC001", "payment_amount": 2000 })).await;

        let (status, body) = history(&state, "ACC001").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["account_number"], json!("ACC001"));
        assert_eq!(body["data"]["total_payments"], json!(2));
        assert_eq!(body["data"]["customer_details"]["emi_due"], json!(15000.0));
        assert_eq!(body["data"]["customer_details"]["issue_date"], json!("2024-01-15"));
        assert_eq!(body["data"]["payment_history"][0]["payment_amount"], json!(2000.0));
        assert_eq!(body["data"]["payment_history"][1]["payment_amount"], json!(1000.0));
    }

    #[tokio::test]
    async fn history_of_unknown_account_is_404() {
        let (state, _repo) = state_with(dec!(15000), None, 3).await;

        let (status, body) = history(&state, "ACC404").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Customer not found with the provided account number"));
    }
}
