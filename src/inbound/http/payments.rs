//! Payment endpoints.
//!
//! Intent creation talks to the payment processor; recording persists what
//! the browser-side confirmation reported. There is no reconciliation
//! between the two here.

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::payment::PaymentIntent;
use crate::domain::ports::NewPayment;
use crate::domain::{Error, Identity, PaymentRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::{Authenticated, OwnerQuery};
use crate::inbound::http::state::HttpState;

const DEFAULT_CURRENCY: &str = "usd";

/// Body for creating a processor intent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    /// Amount in minor currency units.
    #[schema(example = 1250)]
    pub amount: i64,
    /// Lowercase ISO currency code; defaults to `usd`.
    pub currency: Option<String>,
}

/// Body for recording a settled payment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    /// Payer identity; must match the credential.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: String,
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    /// Processor-side intent identifier.
    pub intent_id: String,
}

/// Create a payment intent with the processor.
#[utoipa::path(
    post,
    path = "/payments/intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntent),
        (status = 400, description = "Invalid amount", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 502, description = "Processor failure", body = crate::inbound::http::ApiError)
    ),
    tags = ["payments"],
    operation_id = "createPaymentIntent"
)]
#[post("/payments/intent")]
pub async fn create_payment_intent(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateIntentRequest>,
) -> ApiResult<web::Json<PaymentIntent>> {
    let payload = payload.into_inner();
    if payload.amount < 1 {
        return Err(Error::invalid_request("amount must be at least 1").into());
    }
    let currency = payload
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());

    let intent = state.gateway.create_intent(payload.amount, &currency).await?;
    Ok(web::Json(intent))
}

/// Record a settled payment for the authenticated payer.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentRecord),
        (status = 400, description = "Invalid body", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["payments"],
    operation_id = "recordPayment"
)]
#[post("/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<RecordPaymentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let payer = Identity::new(payload.email.clone())
        .map_err(|error| Error::invalid_request(format!("email: {error}")))?;
    auth.require_owner(&payer)?;

    if payload.amount < 1 {
        return Err(Error::invalid_request("amount must be at least 1").into());
    }
    if payload.intent_id.trim().is_empty() {
        return Err(Error::invalid_request("intentId must not be empty").into());
    }

    let record = state
        .payments
        .insert(NewPayment {
            payer_email: payer,
            amount: payload.amount,
            currency: payload.currency,
            intent_id: payload.intent_id,
            created_at: Utc::now(),
        })
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// The authenticated payer's payment history, newest first.
#[utoipa::path(
    get,
    path = "/payments",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Payment history", body = [PaymentRecord]),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<PaymentRecord>>> {
    let payer = query.identity()?;
    auth.require_owner(&payer)?;
    let records = state.payments.by_payer(&payer).await?;
    Ok(web::Json(records))
}
