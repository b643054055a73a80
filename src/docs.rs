// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EMI Collection API",
        description = "Registro de pagamentos de parcelas (EMI) e consulta de contas"
    ),
    paths(
        // --- Payments ---
        handlers::payments::create_payment,
        handlers::payments::get_payment_history,

        // --- Customers ---
        handlers::customers::list_customers,
    ),
    components(
        schemas(
            // --- Payments ---
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::PaymentRecord,
            models::payment::PaymentConfirmation,
            models::payment::PaymentHistoryView,

            // --- Customers ---
            models::customer::CustomerOverview,
            models::customer::CustomerDetails,

            // --- Payloads ---
            handlers::payments::CreatePaymentPayload,
        )
    ),
    tags(
        (name = "Payments", description = "Aplicação de pagamentos e histórico"),
        (name = "Customers", description = "Contas de empréstimo")
    )
)]
pub struct ApiDoc;
