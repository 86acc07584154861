//! Environment-driven application configuration.
//!
//! Centralises the environment parsing so it is validated consistently and
//! can be tested in isolation. Debug builds tolerate missing toggles with
//! warnings and fall back to fixtures; release builds require the signing
//! secret, the data-store connection string, and the processor key.

use std::net::SocketAddr;

use mockable::Env;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::warn;

use crate::domain::SigningSecret;
use crate::domain::credential::SecretTooShort;
use crate::inbound::http::guard::CookiePolicy;

const PORT_ENV: &str = "PORT";
const APP_ENV: &str = "APP_ENV";
const SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_NAME_ENV: &str = "DATABASE_NAME";
const STRIPE_KEY_ENV: &str = "STRIPE_SECRET_KEY";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_NAME: &str = "dine-portal";
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode controlling configuration strictness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds warn and fall back where possible.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Deployment environment controlling credential-cookie attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Deployment {
    /// Served cross-site behind TLS.
    Production,
    /// Local or same-site deployments.
    Development,
}

impl Deployment {
    /// Cookie attributes for this deployment.
    #[must_use]
    pub fn cookie_policy(self) -> CookiePolicy {
        match self {
            Self::Production => CookiePolicy::production(),
            Self::Development => CookiePolicy::development(),
        }
    }
}

/// Data-store settings.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Connection string.
    pub url: String,
    /// Database name.
    pub name: String,
}

/// Fully parsed application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub deployment: Deployment,
    pub secret: SigningSecret,
    /// Absent in store-less debug runs; repositories fall back to fixtures.
    pub database: Option<StoreSettings>,
    /// Absent in processor-less debug runs; the gateway falls back to a
    /// fixture.
    pub stripe_secret_key: Option<String>,
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The signing secret is too short to be safe.
    #[error("{SECRET_ENV} rejected: {source}")]
    WeakSecret {
        #[source]
        source: SecretTooShort,
    },
}

/// Parse application configuration from the environment.
pub fn app_config_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppConfig, ConfigError> {
    let port = port_from_env(env, mode)?;
    let deployment = deployment_from_env(env, mode)?;
    let secret = secret_from_env(env, mode)?;
    let database = database_from_env(env, mode)?;
    let stripe_secret_key = stripe_key_from_env(env, mode)?;

    Ok(AppConfig {
        bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        deployment,
        secret,
        database,
        stripe_secret_key,
    })
}

fn port_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<u16, ConfigError> {
    match env.string(PORT_ENV) {
        Some(value) => match value.parse::<u16>() {
            Ok(port) => Ok(port),
            Err(_) => {
                if mode.is_debug() {
                    warn!(value = %value, "invalid PORT; defaulting to {DEFAULT_PORT}");
                    Ok(DEFAULT_PORT)
                } else {
                    Err(ConfigError::InvalidEnv {
                        name: PORT_ENV,
                        value,
                        expected: "a TCP port number",
                    })
                }
            }
        },
        None => Ok(DEFAULT_PORT),
    }
}

fn deployment_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Deployment, ConfigError> {
    match env.string(APP_ENV) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "production" => Ok(Deployment::Production),
            "development" => Ok(Deployment::Development),
            _ => {
                if mode.is_debug() {
                    warn!(value = %value, "invalid APP_ENV; assuming development");
                    Ok(Deployment::Development)
                } else {
                    Err(ConfigError::InvalidEnv {
                        name: APP_ENV,
                        value,
                        expected: "production|development",
                    })
                }
            }
        },
        None => {
            if mode.is_debug() {
                Ok(Deployment::Development)
            } else {
                Err(ConfigError::MissingEnv { name: APP_ENV })
            }
        }
    }
}

fn secret_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SigningSecret, ConfigError> {
    match env.string(SECRET_ENV) {
        Some(value) => {
            SigningSecret::new(value).map_err(|source| ConfigError::WeakSecret { source })
        }
        None => {
            if mode.is_debug() {
                warn!("{SECRET_ENV} not set; using an ephemeral secret (dev only)");
                let secret: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(EPHEMERAL_SECRET_LEN)
                    .map(char::from)
                    .collect();
                SigningSecret::new(secret).map_err(|source| ConfigError::WeakSecret { source })
            } else {
                Err(ConfigError::MissingEnv { name: SECRET_ENV })
            }
        }
    }
}

fn database_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<StoreSettings>, ConfigError> {
    match env.string(DATABASE_URL_ENV) {
        Some(url) => {
            let name = env
                .string(DATABASE_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_owned());
            Ok(Some(StoreSettings { url, name }))
        }
        None => {
            if mode.is_debug() {
                warn!("{DATABASE_URL_ENV} not set; using in-memory fixtures (dev only)");
                Ok(None)
            } else {
                Err(ConfigError::MissingEnv {
                    name: DATABASE_URL_ENV,
                })
            }
        }
    }
}

fn stripe_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Option<String>, ConfigError> {
    match env.string(STRIPE_KEY_ENV) {
        Some(key) => Ok(Some(key)),
        None => {
            if mode.is_debug() {
                warn!("{STRIPE_KEY_ENV} not set; using the fixture gateway (dev only)");
                Ok(None)
            } else {
                Err(ConfigError::MissingEnv {
                    name: STRIPE_KEY_ENV,
                })
            }
        }
    }
}
