//! Tollgate HTTP API service.
//!
//! This crate provides the HTTP API for the tollgate credit ledger,
//! including:
//!
//! - Balance reads, credit validation and usage deduction
//! - Auto-recharge configuration and the recharge control loop
//! - Hosted checkout top-ups reconciled via processor webhooks
//!
//! # Ledger ownership
//!
//! The payment processor owns the transaction history; tollgate derives
//! balances from it on every read and serializes all mutations per
//! customer. Locally it stores only customer links, recharge settings and
//! processed webhook event ids.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for consistency

pub mod auth;
pub mod config;
pub mod customers;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod processor;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use ledger::{Ledger, LedgerError};
pub use processor::{PaymentProcessor, ProcessorError};
pub use routes::create_router;
pub use state::AppState;
