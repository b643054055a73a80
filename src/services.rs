pub mod customer_service;
pub use customer_service::CustomerService;
pub mod payment_engine;
pub mod payment_service;
pub use payment_service::PaymentService;
