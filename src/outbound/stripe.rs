//! Stripe payment-intent adapter.
//!
//! Owns transport details only: form encoding, authentication, timeout, and
//! mapping of transport or status failures into the domain taxonomy. The
//! processor's response detail never reaches clients, only the logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::error;
use url::Url;

use crate::domain::Error;
use crate::domain::payment::PaymentIntent;
use crate::domain::ports::PaymentGateway;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway performing form POSTs against Stripe's payment-intent endpoint.
pub struct StripeGateway {
    client: Client,
    base: Url,
    secret_key: String,
}

impl StripeGateway {
    /// Build a gateway against the public Stripe API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let base = Url::parse(STRIPE_API_BASE)
            .unwrap_or_else(|error| panic!("stripe base URL failed to parse: {error}"));
        Self::with_base(secret_key, base, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build a gateway against an explicit endpoint, for tests and mocks.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn with_base(
        secret_key: impl Into<String>,
        base: Url,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            secret_key: secret_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IntentDto {
    id: String,
    client_secret: String,
}

fn parse_intent(body: &[u8]) -> Result<PaymentIntent, Error> {
    let decoded: IntentDto = serde_json::from_slice(body).map_err(|err| {
        error!(error = %err, "payment processor returned an undecodable intent");
        Error::upstream("payment processor returned an invalid response")
    })?;
    Ok(PaymentIntent {
        id: decoded.id,
        client_secret: decoded.client_secret,
    })
}

fn map_status_error(status: StatusCode, body: &[u8]) -> Error {
    let preview = String::from_utf8_lossy(body)
        .chars()
        .take(200)
        .collect::<String>();
    error!(status = status.as_u16(), body = %preview, "payment processor rejected the request");
    Error::upstream("payment processor request failed")
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, Error> {
        let endpoint = self
            .base
            .join("payment_intents")
            .map_err(|err| Error::internal(format!("payment endpoint failed to resolve: {err}")))?;

        let response = self
            .client
            .post(endpoint)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", currency.to_owned()),
                ("automatic_payment_methods[enabled]", "true".to_owned()),
            ])
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "payment processor unreachable");
                Error::upstream("payment processor unreachable")
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            error!(error = %err, "payment processor response truncated");
            Error::upstream("payment processor unreachable")
        })?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_intent(body.as_ref())
    }
}
