//! Common test utilities for tollgate integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use tempfile::TempDir;

use tollgate_core::{CustomerRef, Transaction};
use tollgate_service::processor::signature;
use tollgate_service::processor::types::{Charge, CheckoutSession};
use tollgate_service::processor::TransactionPage;
use tollgate_service::{
    create_router, AppState, PaymentProcessor, ProcessorError, ServiceConfig,
};
use tollgate_store::{RocksStore, Store};

/// Webhook signing secret used by the test harness.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// An in-memory payment processor for tests.
///
/// Owns customers and their balance-transaction ledgers the way the real
/// processor does, and records every charge attempt and checkout session
/// for assertions.
#[derive(Default)]
pub struct MockProcessor {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    customers: HashMap<String, MockCustomer>,
    charges: Vec<ChargeRecord>,
    sessions: Vec<SessionRecord>,
    fail_charges: bool,
}

#[derive(Default)]
struct MockCustomer {
    payment_method: Option<String>,
    transactions: Vec<Transaction>,
}

/// A recorded charge attempt.
#[derive(Debug, Clone)]
pub struct ChargeRecord {
    /// The charged customer.
    pub customer_ref: String,
    /// Charge amount in cents.
    pub amount_cents: i64,
    /// The idempotency key the caller supplied.
    pub idempotency_key: String,
}

/// A recorded checkout session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Session id.
    pub id: String,
    /// The customer the session was created for.
    pub customer_ref: String,
    /// Line-item amount in cents.
    pub amount_cents: i64,
    /// Success redirect URL.
    pub success_url: String,
    /// Cancel redirect URL.
    pub cancel_url: String,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(inner: &mut Inner, prefix: &str) -> String {
        inner.next_id += 1;
        format!("{prefix}_{}", inner.next_id)
    }

    /// The single customer created so far (panics unless exactly one).
    pub fn only_customer_ref(&self) -> String {
        let inner = self.inner.lock().unwrap();
        assert_eq!(inner.customers.len(), 1, "expected exactly one customer");
        inner.customers.keys().next().unwrap().clone()
    }

    /// Seed a credit grant directly into a customer's ledger.
    pub fn grant(&self, customer_ref: &str, amount_cents: i64) {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::next_id(&mut inner, "txn");
        let customer = inner
            .customers
            .get_mut(customer_ref)
            .expect("unknown customer");
        customer.transactions.push(Transaction {
            id,
            customer_ref: CustomerRef::new(customer_ref),
            amount_cents: -amount_cents,
            description: "Seeded grant".into(),
            created_at: Utc::now(),
        });
    }

    /// Attach a default payment method to a customer.
    pub fn set_default_payment_method(&self, customer_ref: &str, payment_method: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .customers
            .get_mut(customer_ref)
            .expect("unknown customer")
            .payment_method = Some(payment_method.to_string());
    }

    /// Make all subsequent charge attempts decline.
    pub fn set_fail_charges(&self, fail: bool) {
        self.inner.lock().unwrap().fail_charges = fail;
    }

    /// Number of charge attempts made (including declined ones).
    pub fn charge_count(&self) -> usize {
        self.inner.lock().unwrap().charges.len()
    }

    /// All recorded charge attempts.
    pub fn charges(&self) -> Vec<ChargeRecord> {
        self.inner.lock().unwrap().charges.clone()
    }

    /// All recorded checkout sessions.
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.inner.lock().unwrap().sessions.clone()
    }

    /// A customer's ledger, oldest first.
    pub fn transactions(&self, customer_ref: &str) -> Vec<Transaction> {
        let inner = self.inner.lock().unwrap();
        inner
            .customers
            .get(customer_ref)
            .map(|c| c.transactions.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_customer(
        &self,
        _platform_user_id: &str,
        _email: Option<&str>,
        _name: Option<&str>,
    ) -> Result<CustomerRef, ProcessorError> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::next_id(&mut inner, "cus");
        inner.customers.insert(id.clone(), MockCustomer::default());
        Ok(CustomerRef::new(id))
    }

    async fn create_balance_transaction(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Transaction, ProcessorError> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::next_id(&mut inner, "txn");
        let customer = inner
            .customers
            .get_mut(customer_ref.as_str())
            .ok_or_else(|| no_such_customer(customer_ref))?;

        let tx = Transaction {
            id,
            customer_ref: customer_ref.clone(),
            amount_cents,
            description: description.to_string(),
            created_at: Utc::now(),
        };
        customer.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn list_balance_transactions(
        &self,
        customer_ref: &CustomerRef,
        limit: u32,
        starting_after: Option<&str>,
    ) -> Result<TransactionPage, ProcessorError> {
        let inner = self.inner.lock().unwrap();
        let customer = inner
            .customers
            .get(customer_ref.as_str())
            .ok_or_else(|| no_such_customer(customer_ref))?;

        // Newest first, like the real list endpoint.
        let ordered: Vec<Transaction> = customer.transactions.iter().rev().cloned().collect();

        let start = match starting_after {
            None => 0,
            Some(cursor) => ordered
                .iter()
                .position(|tx| tx.id == cursor)
                .map_or(ordered.len(), |idx| idx + 1),
        };

        let transactions: Vec<Transaction> = ordered
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        let has_more = start + transactions.len() < ordered.len();

        Ok(TransactionPage {
            transactions,
            has_more,
        })
    }

    async fn get_default_payment_method(
        &self,
        customer_ref: &CustomerRef,
    ) -> Result<Option<String>, ProcessorError> {
        let inner = self.inner.lock().unwrap();
        let customer = inner
            .customers
            .get(customer_ref.as_str())
            .ok_or_else(|| no_such_customer(customer_ref))?;
        Ok(customer.payment_method.clone())
    }

    async fn create_charge(
        &self,
        customer_ref: &CustomerRef,
        _payment_method: &str,
        amount_cents: i64,
        idempotency_key: &str,
    ) -> Result<Charge, ProcessorError> {
        let mut inner = self.inner.lock().unwrap();
        inner.charges.push(ChargeRecord {
            customer_ref: customer_ref.as_str().to_string(),
            amount_cents,
            idempotency_key: idempotency_key.to_string(),
        });

        if inner.fail_charges {
            return Err(ProcessorError::Api {
                error_type: "card_error".into(),
                message: "Your card was declined".into(),
                code: Some("card_declined".into()),
            });
        }

        let id = Self::next_id(&mut inner, "pi");
        Ok(Charge {
            id,
            status: "succeeded".into(),
        })
    }

    async fn create_checkout_session(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, ProcessorError> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::next_id(&mut inner, "cs");
        inner.sessions.push(SessionRecord {
            id: id.clone(),
            customer_ref: customer_ref.as_str().to_string(),
            amount_cents,
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        });

        Ok(CheckoutSession {
            id: id.clone(),
            url: Some(format!("https://checkout.example/{id}")),
        })
    }
}

fn no_such_customer(customer_ref: &CustomerRef) -> ProcessorError {
    ProcessorError::Api {
        error_type: "invalid_request_error".into(),
        message: format!("No such customer: {customer_ref}"),
        code: Some("resource_missing".into()),
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Application state, for driving the ledger engine directly.
    pub state: AppState,
    /// The mock processor, for seeding and assertions.
    pub processor: Arc<MockProcessor>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The platform user id used for authenticated requests.
    pub platform_user_id: String,
}

impl TestHarness {
    /// Create a harness with no sign-up credit and a webhook secret.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness with adjusted configuration.
    pub fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store: Arc<dyn Store> =
            Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            stripe_api_key: None,
            stripe_webhook_secret: Some(TEST_WEBHOOK_SECRET.into()),
            signup_credit_cents: 0,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            pricing: tollgate_core::PriceTable::default(),
        };
        adjust(&mut config);

        let processor = Arc::new(MockProcessor::new());
        let processor_dyn: Arc<dyn PaymentProcessor> = Arc::clone(&processor);
        let state = AppState::new(store, processor_dyn, config);

        let router: Router = create_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            processor,
            _temp_dir: temp_dir,
            platform_user_id: "user-1".into(),
        }
    }

    /// The caller identity header value for the harness user.
    pub fn user_id_header(&self) -> String {
        self.platform_user_id.clone()
    }

    /// Create the harness user's customer (via a balance read) and return
    /// its processor reference.
    pub async fn ensure_customer(&self) -> String {
        self.server
            .get("/v1/credit")
            .add_header("x-platform-user-id", self.user_id_header())
            .await
            .assert_status_ok();
        self.processor.only_customer_ref()
    }

    /// Sign a webhook payload the way the processor would.
    pub fn sign_webhook(&self, payload: &str) -> String {
        signature::signature_header(TEST_WEBHOOK_SECRET, Utc::now().timestamp(), payload)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
