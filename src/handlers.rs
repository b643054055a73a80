// src/handlers.rs

pub mod customers;
pub mod payments;
