//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::inbound::http::guard::GuardSettings;
use crate::outbound::persistence::DocumentStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) guard: GuardSettings,
    pub(crate) store: Option<DocumentStore>,
    pub(crate) stripe_key: Option<String>,
}

impl ServerConfig {
    /// Construct a server configuration from bind address and guard settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, guard: GuardSettings) -> Self {
        Self {
            bind_addr,
            guard,
            store: None,
            stripe_key: None,
        }
    }

    /// Attach a connected document store.
    ///
    /// Without one the server runs on in-memory fixtures, which only makes
    /// sense for development and tests.
    #[must_use]
    pub fn with_store(mut self, store: DocumentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach the payment-processor secret key.
    #[must_use]
    pub fn with_stripe_key(mut self, key: String) -> Self {
        self.stripe_key = Some(key);
        self
    }
}
