//! Credential issuance and verification.
//!
//! A credential is a signed HS256 token embedding a subject identity and an
//! expiration instant fixed at issuance. Verification is a pure function of
//! the token and the signing secret: there is no server-side session store,
//! and revocation happens client-side by deleting the cookie, so a replayed
//! token stays valid until its original expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::identity::Identity;

/// Credential lifetime in days, fixed at issuance.
pub const TOKEN_TTL_DAYS: i64 = 2;

/// Minimum accepted signing-secret length in bytes.
pub const SECRET_MIN_LEN: usize = 32;

/// Failures raised while issuing or verifying a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The token reached its expiration instant.
    #[error("credential expired")]
    Expired,
    /// Signature mismatch, malformed token, or a subject that fails
    /// identity validation.
    #[error("credential invalid: {reason}")]
    Invalid { reason: String },
    /// Signing failed; only possible with a broken secret or claims shape.
    #[error("credential could not be signed: {reason}")]
    Signing { reason: String },
}

impl CredentialError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// HS256 signing secret, wiped from memory on drop.
#[derive(Clone)]
pub struct SigningSecret(String);

/// Error for secrets shorter than [`SECRET_MIN_LEN`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("signing secret must be at least {SECRET_MIN_LEN} bytes, got {length}")]
pub struct SecretTooShort {
    length: usize,
}

impl SigningSecret {
    /// Validate and construct a signing secret.
    pub fn new(secret: impl Into<String>) -> Result<Self, SecretTooShort> {
        let secret = secret.into();
        if secret.len() < SECRET_MIN_LEN {
            return Err(SecretTooShort {
                length: secret.len(),
            });
        }
        Ok(Self(secret))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Claims embedded in the signed token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Sign a credential for `identity`, valid for [`TOKEN_TTL_DAYS`] from `now`.
pub fn issue(
    identity: &Identity,
    secret: &SigningSecret,
    now: DateTime<Utc>,
) -> Result<String, CredentialError> {
    let claims = Claims {
        sub: identity.as_ref().to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|error| CredentialError::Signing {
        reason: error.to_string(),
    })
}

/// Verify a credential and return its embedded identity.
///
/// Rejects missing or mismatched signatures and tokens past their
/// expiration instant. Expiry is checked with zero leeway.
pub fn verify(token: &str, secret: &SigningSecret) -> Result<Identity, CredentialError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|error| {
        if matches!(error.kind(), ErrorKind::ExpiredSignature) {
            CredentialError::Expired
        } else {
            CredentialError::invalid(error.to_string())
        }
    })?;

    Identity::new(data.claims.sub).map_err(|error| CredentialError::invalid(error.to_string()))
}

/// Decode the expiration instant of a well-signed token, skipping the
/// expiry check itself.
///
/// Exposed for tests and diagnostics; authorisation decisions must go
/// through [`verify`].
pub fn expires_at(token: &str, secret: &SigningSecret) -> Result<DateTime<Utc>, CredentialError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|error| CredentialError::invalid(error.to_string()))?;

    DateTime::<Utc>::from_timestamp(data.claims.exp, 0)
        .ok_or_else(|| CredentialError::invalid("exp claim out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn secret() -> SigningSecret {
        SigningSecret::new("0123456789abcdef0123456789abcdef").expect("test secret")
    }

    fn identity(raw: &str) -> Identity {
        Identity::new(raw).expect("test identity")
    }

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let ada = identity("ada@example.com");
        let token = issue(&ada, &secret(), Utc::now()).expect("issue");
        let verified = verify(&token, &secret()).expect("verify");
        assert_eq!(verified, ada);
    }

    #[test]
    fn expired_credential_is_rejected_regardless_of_signature() {
        let issued_at = Utc::now() - Duration::days(TOKEN_TTL_DAYS) - Duration::seconds(5);
        let token = issue(&identity("ada@example.com"), &secret(), issued_at).expect("issue");
        assert_eq!(
            verify(&token, &secret()).expect_err("must reject"),
            CredentialError::Expired
        );
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid() {
        let token = issue(&identity("ada@example.com"), &secret(), Utc::now()).expect("issue");
        let other = SigningSecret::new("ffffffffffffffffffffffffffffffff").expect("secret");
        assert!(matches!(
            verify(&token, &other).expect_err("must reject"),
            CredentialError::Invalid { .. }
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("aaaa.bbbb.cccc")]
    fn garbage_tokens_are_invalid(#[case] token: &str) {
        assert!(matches!(
            verify(token, &secret()).expect_err("must reject"),
            CredentialError::Invalid { .. }
        ));
    }

    #[test]
    fn reissue_shifts_expiry_but_not_identity() {
        let ada = identity("ada@example.com");
        let first_issued = Utc::now() - Duration::hours(1);
        let second_issued = Utc::now();
        let first = issue(&ada, &secret(), first_issued).expect("issue");
        let second = issue(&ada, &secret(), second_issued).expect("issue");

        assert_eq!(verify(&first, &secret()).expect("verify"), ada);
        assert_eq!(verify(&second, &secret()).expect("verify"), ada);
        let first_exp = expires_at(&first, &secret()).expect("exp");
        let second_exp = expires_at(&second, &secret()).expect("exp");
        assert!(first_exp < second_exp);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(SigningSecret::new("too-short").is_err());
    }
}
