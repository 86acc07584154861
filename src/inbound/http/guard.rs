//! Access-control guard: credential cookie handling, verification, and
//! ownership enforcement.
//!
//! The guard is stateless. Verification is a pure function of the `token`
//! cookie and the signing secret, so any number of requests may be checked
//! concurrently. Handlers take an [`Authenticated`] extractor argument to be
//! placed behind the guard; requests without a valid credential never reach
//! them. Owner-scoped handlers additionally call
//! [`Authenticated::require_owner`] with the caller-supplied owner identity
//! before touching data.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::credential::{self, CredentialError};
use crate::domain::{Error, Identity, SigningSecret};
use crate::inbound::http::ApiError;
use crate::inbound::http::state::HttpState;

/// Name of the credential cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie attributes applied to the credential cookie.
///
/// `HttpOnly` always; `Secure` plus `SameSite=None` only for production
/// deployments served cross-site, `SameSite=Strict` everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    secure: bool,
    same_site: SameSite,
}

impl CookiePolicy {
    /// Policy for cross-site production deployments.
    pub fn production() -> Self {
        Self {
            secure: true,
            same_site: SameSite::None,
        }
    }

    /// Policy for same-site development deployments.
    pub fn development() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Strict,
        }
    }

    /// Build the credential cookie carrying `token`.
    pub fn bearer(&self, token: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish()
    }

    /// Build a cookie that clears the credential on the client.
    ///
    /// Idempotent from the client's point of view; setting it without an
    /// existing credential is harmless.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.bearer(String::new());
        cookie.make_removal();
        cookie
    }
}

/// Signing secret and cookie policy shared by the guard and the token
/// endpoints.
#[derive(Debug, Clone)]
pub struct GuardSettings {
    pub secret: SigningSecret,
    pub cookies: CookiePolicy,
}

/// Proof that the request carried a valid credential.
///
/// Constructed only by the extractor, so a handler taking this argument
/// cannot run unauthenticated.
#[derive(Debug, Clone)]
pub struct Authenticated {
    identity: Identity,
}

impl Authenticated {
    /// Identity embedded in the verified credential.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Reject the request unless the caller-supplied owner identity is
    /// byte-equal to the credential identity.
    pub fn require_owner(&self, claimed: &Identity) -> Result<(), Error> {
        if &self.identity == claimed {
            Ok(())
        } else {
            Err(Error::forbidden("forbidden"))
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let cookie = req
        .cookie(TOKEN_COOKIE)
        .ok_or_else(|| Error::unauthorized("authentication required"))?;

    match credential::verify(cookie.value(), &state.guard.secret) {
        Ok(identity) => Ok(Authenticated { identity }),
        Err(CredentialError::Expired) => Err(Error::unauthorized("credential expired")),
        Err(_) => Err(Error::unauthorized("invalid credential")),
    }
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(ApiError::from))
    }
}

/// Query parameter naming the resource owner on owner-scoped routes.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnerQuery {
    /// Owner identity the caller claims to act for.
    pub email: String,
}

impl OwnerQuery {
    /// Parse the claimed owner into an [`Identity`].
    pub fn identity(&self) -> Result<Identity, Error> {
        Identity::new(self.email.clone())
            .map_err(|error| Error::invalid_request(format!("email: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::{Duration, Utc};

    use crate::domain::TOKEN_TTL_DAYS;
    use crate::inbound::http::ApiResult;

    fn settings() -> GuardSettings {
        GuardSettings {
            secret: SigningSecret::new("0123456789abcdef0123456789abcdef").expect("secret"),
            cookies: CookiePolicy::development(),
        }
    }

    fn token_for(email: &str, issued_at: chrono::DateTime<Utc>) -> String {
        let identity = Identity::new(email).expect("identity");
        credential::issue(&identity, &settings().secret, issued_at).expect("issue")
    }

    async fn probe(auth: Authenticated, query: web::Query<OwnerQuery>) -> ApiResult<HttpResponse> {
        auth.require_owner(&query.identity()?)?;
        Ok(HttpResponse::Ok().body(auth.identity().to_string()))
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::in_memory(settings())))
            .route("/probe", web::get().to(probe))
    }

    #[actix_web::test]
    async fn missing_cookie_is_unauthorised() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/probe?email=ada%40example.com")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_token_is_unauthorised() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/probe?email=ada%40example.com")
                .cookie(Cookie::new(TOKEN_COOKIE, "not-a-real-token"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn expired_token_is_unauthorised() {
        let app = test::init_service(test_app()).await;
        let stale = Utc::now() - Duration::days(TOKEN_TTL_DAYS) - Duration::seconds(5);
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/probe?email=ada%40example.com")
                .cookie(Cookie::new(TOKEN_COOKIE, token_for("ada@example.com", stale)))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn mismatched_owner_is_forbidden() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/probe?email=grace%40example.com")
                .cookie(Cookie::new(
                    TOKEN_COOKIE,
                    token_for("ada@example.com", Utc::now()),
                ))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn matching_owner_reaches_the_handler() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/probe?email=ada%40example.com")
                .cookie(Cookie::new(
                    TOKEN_COOKIE,
                    token_for("ada@example.com", Utc::now()),
                ))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "ada@example.com");
    }

    #[::core::prelude::v1::test]
    fn production_policy_is_cross_site_and_secure() {
        let cookie = CookiePolicy::production().bearer("tok".into());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[::core::prelude::v1::test]
    fn development_policy_is_same_site_strict() {
        let cookie = CookiePolicy::development().bearer("tok".into());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[::core::prelude::v1::test]
    fn removal_cookie_expires_immediately() {
        let cookie = CookiePolicy::development().removal();
        assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}
