//! Credential issuance and revocation endpoints.
//!
//! ```text
//! POST /jwt    {"email":"ada@example.com", ...}  -> Set-Cookie: token=...
//! POST /logout                                   -> Set-Cookie: token=; Max-Age=0
//! ```
//!
//! Issuance signs whatever identity the caller asserts; there is no password
//! or account check behind it. Pairing it with a real authentication step is
//! deliberately out of scope for this service. Revocation only clears the
//! client-side cookie: a copied token value stays valid until its original
//! expiration instant.

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use serde_json::{Value, json};

use crate::domain::{Error, Identity, credential};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Sign a credential for the asserted identity and set the `token` cookie.
#[utoipa::path(
    post,
    path = "/jwt",
    responses(
        (status = 200, description = "Credential issued", headers(("Set-Cookie" = String, description = "HTTP-only token cookie"))),
        (status = 400, description = "Missing or malformed email", body = crate::inbound::http::ApiError)
    ),
    tags = ["auth"],
    operation_id = "issueToken"
)]
#[post("/jwt")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_request("email is required"))?;
    let identity =
        Identity::new(email).map_err(|error| Error::invalid_request(format!("email: {error}")))?;

    let token = credential::issue(&identity, &state.guard.secret, Utc::now())
        .map_err(|error| Error::internal(format!("failed to sign credential: {error}")))?;

    Ok(HttpResponse::Ok()
        .cookie(state.guard.cookies.bearer(token))
        .json(json!({ "success": true })))
}

/// Clear the `token` cookie. Succeeds whether or not one was present.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Credential cleared", headers(("Set-Cookie" = String, description = "Expired token cookie")))
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(state.guard.cookies.removal())
        .json(json!({ "success": true })))
}
