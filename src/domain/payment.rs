//! Recorded payments and processor intents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::Identity;

/// A confirmed payment persisted after the processor settles an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    /// Payer identity; compared against the credential on reads.
    #[schema(value_type = String, example = "ada@example.com")]
    pub payer_email: Identity,
    /// Amount in minor currency units.
    #[schema(example = 1250)]
    pub amount: i64,
    /// Lowercase ISO currency code.
    #[schema(example = "usd")]
    pub currency: String,
    /// Processor-side intent identifier.
    pub intent_id: String,
    pub created_at: DateTime<Utc>,
}

/// A processor payment intent awaiting client-side confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Processor-side intent identifier.
    pub id: String,
    /// Secret the browser hands to the processor's payment element.
    pub client_secret: String,
}
