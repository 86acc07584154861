//! Payment-processor gateway port.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::payment::PaymentIntent;

/// Port for creating payment intents against the processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount` minor currency units in `currency`.
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, Error>;
}

/// Deterministic gateway used by tests and processor-less dev runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, Error> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        Ok(PaymentIntent {
            id: format!("pi_fixture_{nonce}"),
            client_secret: format!("pi_fixture_{nonce}_secret_{currency}_{amount}"),
        })
    }
}
