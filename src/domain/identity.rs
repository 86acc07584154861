//! Subject identity asserted by credentials and compared on owner-scoped
//! routes.
//!
//! Ownership checks require the credential identity and the caller-supplied
//! owner identity to be byte-equal, so construction validates shape but never
//! normalises (no trimming, no case folding).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    Empty,
    NotEmailShaped,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identity must not be empty"),
            Self::NotEmailShaped => write!(f, "identity must be an email-like address"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

static IDENTITY_RE: OnceLock<Regex> = OnceLock::new();

fn identity_regex() -> &'static Regex {
    IDENTITY_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("identity regex failed to compile: {error}"))
    })
}

/// Email-like subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate and construct an [`Identity`].
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentityValidationError::Empty);
        }
        if !identity_regex().is_match(&raw) {
            return Err(IdentityValidationError::NotEmailShaped);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
