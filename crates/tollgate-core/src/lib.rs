//! Core types and utilities for tollgate.
//!
//! This crate provides the foundational types for the tollgate prepaid
//! credit ledger:
//!
//! - **Identifiers**: `CustomerRef`, `PlatformUserId`
//! - **Ledger**: `Transaction`, `Balance`
//! - **Pricing**: `PriceTable`, `CreditConsumption`
//! - **Settings**: `AutoRechargeSettings`
//! - **Customers**: `CustomerLink`
//!
//! # Credit unit
//!
//! **1 credit = $0.01 (1 cent)**
//!
//! All amounts are stored as `i64` integer cents to avoid floating point
//! drift across thousands of token-priced deductions. The ledger sign
//! convention follows the payment processor's balance transactions:
//! **negative = credit granted, positive = usage debited**.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod balance;
pub mod consumption;
pub mod customer;
pub mod ids;
pub mod pricing;
pub mod settings;
pub mod transaction;

pub use balance::Balance;
pub use consumption::{ConsumptionKind, CreditConsumption, CreditConsumptionItem};
pub use customer::CustomerLink;
pub use ids::{CustomerRef, IdError, PlatformUserId};
pub use pricing::PriceTable;
pub use settings::{
    AutoRechargeSettings, DEFAULT_RECHARGE_CENTS, DEFAULT_RECHARGE_THRESHOLD_CENTS,
};
pub use transaction::Transaction;
