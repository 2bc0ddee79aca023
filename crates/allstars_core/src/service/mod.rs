//! Core use-case services.
//!
//! # Responsibility
//! - Run card operations as single store transactions.
//! - Keep callers decoupled from SQL and transaction handling.

pub mod card_service;
