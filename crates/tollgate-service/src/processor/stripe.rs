//! Stripe implementation of the payment processor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use tollgate_core::{CustomerRef, Transaction};

use super::types::{
    BalanceTransaction, Charge, CheckoutSession, Customer, PaymentMethod, StripeErrorResponse,
    StripeList,
};
use super::{PaymentProcessor, ProcessorError, TransactionPage};

/// Retries after the first attempt, for idempotent reads only.
const READ_RETRIES: u32 = 2;

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Stripe API base URL.
    const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, Self::BASE_URL)
    }

    /// Create a client against a non-default base URL (stripe-mock, tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Send a read request, retrying transport failures with bounded backoff.
    ///
    /// Only used for idempotent GETs; writes rely on idempotency keys
    /// instead of blind retries.
    async fn send_read<F>(&self, build: F) -> Result<reqwest::Response, ProcessorError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match build().send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < READ_RETRIES && (e.is_timeout() || e.is_connect()) => {
                    attempt += 1;
                    tracing::debug!(attempt, error = %e, "Retrying processor read");
                    tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProcessorError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(ProcessorError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(ProcessorError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_customer(
        &self,
        platform_user_id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<CustomerRef, ProcessorError> {
        let mut params = vec![(
            "metadata[platform_user_id]",
            platform_user_id.to_string(),
        )];

        if let Some(email) = email {
            params.push(("email", email.to_string()));
        }
        if let Some(name) = name {
            params.push(("name", name.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        let customer: Customer = Self::handle_response(response).await?;
        Ok(CustomerRef::new(customer.id))
    }

    async fn create_balance_transaction(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Transaction, ProcessorError> {
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", "usd".to_string()),
            ("description", description.to_string()),
        ];

        let response = self
            .client
            .post(format!(
                "{}/customers/{}/balance_transactions",
                self.base_url, customer_ref
            ))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        let wire: BalanceTransaction = Self::handle_response(response).await?;
        Ok(wire.into_transaction(customer_ref))
    }

    async fn list_balance_transactions(
        &self,
        customer_ref: &CustomerRef,
        limit: u32,
        starting_after: Option<&str>,
    ) -> Result<TransactionPage, ProcessorError> {
        let url = format!(
            "{}/customers/{}/balance_transactions",
            self.base_url, customer_ref
        );

        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = starting_after {
            query.push(("starting_after", cursor.to_string()));
        }

        let response = self
            .send_read(|| {
                self.client
                    .get(&url)
                    .basic_auth(&self.api_key, Option::<&str>::None)
                    .query(&query)
            })
            .await?;

        let list: StripeList<BalanceTransaction> = Self::handle_response(response).await?;

        Ok(TransactionPage {
            transactions: list
                .data
                .into_iter()
                .map(|wire| wire.into_transaction(customer_ref))
                .collect(),
            has_more: list.has_more,
        })
    }

    async fn get_default_payment_method(
        &self,
        customer_ref: &CustomerRef,
    ) -> Result<Option<String>, ProcessorError> {
        let customer_url = format!("{}/customers/{}", self.base_url, customer_ref);

        let response = self
            .send_read(|| {
                self.client
                    .get(&customer_url)
                    .basic_auth(&self.api_key, Option::<&str>::None)
            })
            .await?;

        let customer: Customer = Self::handle_response(response).await?;

        if let Some(pm) = customer
            .invoice_settings
            .and_then(|settings| settings.default_payment_method)
        {
            return Ok(Some(pm));
        }

        // No explicit default; fall back to the first attached card.
        let list_url = format!("{}/payment_methods", self.base_url);
        let query = [
            ("customer", customer_ref.to_string()),
            ("type", "card".to_string()),
            ("limit", "1".to_string()),
        ];

        let response = self
            .send_read(|| {
                self.client
                    .get(&list_url)
                    .basic_auth(&self.api_key, Option::<&str>::None)
                    .query(&query)
            })
            .await?;

        let methods: StripeList<PaymentMethod> = Self::handle_response(response).await?;
        Ok(methods.data.into_iter().next().map(|pm| pm.id))
    }

    async fn create_charge(
        &self,
        customer_ref: &CustomerRef,
        payment_method: &str,
        amount_cents: i64,
        idempotency_key: &str,
    ) -> Result<Charge, ProcessorError> {
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", "usd".to_string()),
            ("customer", customer_ref.to_string()),
            ("payment_method", payment_method.to_string()),
            ("off_session", "true".to_string()),
            ("confirm", "true".to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/payment_intents", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn create_checkout_session(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, ProcessorError> {
        let params = [
            ("mode", "payment".to_string()),
            ("customer", customer_ref.to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            ("line_items[0][price_data][currency]", "usd".to_string()),
            (
                "line_items[0][price_data][product_data][name]",
                "Usage credit".to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                amount_cents.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[customer_ref]", customer_ref.to_string()),
            ("metadata[purpose]", "add_credit".to_string()),
            ("metadata[amount_cents]", amount_cents.to_string()),
        ];

        tracing::debug!(
            customer_ref = %customer_ref,
            amount_cents = %amount_cents,
            "Creating checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_uses_default_base_url() {
        let client = StripeClient::new("sk_test_xxx");
        assert_eq!(client.base_url, StripeClient::BASE_URL);
    }

    #[test]
    fn client_accepts_custom_base_url() {
        let client = StripeClient::with_base_url("sk_test_xxx", "http://localhost:12111");
        assert_eq!(client.base_url, "http://localhost:12111");
    }
}
