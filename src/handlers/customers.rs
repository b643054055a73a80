// src/handlers/customers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::ApiError, response::ApiResponse},
    config::AppState,
    middleware::i18n::Locale,
    models::customer::CustomerOverview,
};

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Lista de contas (em `data`, total em `count`)", body = [CustomerOverview])
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .customer_service
        .list_customers()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let count = customers.len();
    Ok((StatusCode::OK, Json(ApiResponse::ok(customers).with_count(count))))
}
