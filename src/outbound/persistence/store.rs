//! Process-wide document-store client with explicit lifecycle.
//!
//! Connected once at startup, injected into repositories through shared
//! state, and shut down on the termination path so in-flight operations
//! drain cleanly. Nothing references the client as ambient global state.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

/// Errors raised while establishing or probing the store connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The connection string was rejected or the client could not be built.
    #[error("failed to connect to document store: {message}")]
    Connect { message: String },

    /// The server did not answer the startup ping.
    #[error("document store ping failed: {message}")]
    Ping { message: String },
}

impl StoreError {
    fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }
}

/// Configuration for the document-store connection.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    uri: String,
    database: String,
    app_name: String,
    server_selection_timeout: Duration,
}

impl StoreConfig {
    /// Create a configuration with a 10 second server-selection timeout.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            app_name: "dine-portal-backend".to_owned(),
            server_selection_timeout: Duration::from_secs(10),
        }
    }

    /// Override the server-selection timeout.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// Database name the repositories operate in.
    pub fn database(&self) -> &str {
        &self.database
    }
}

/// Shared handle to the document store.
///
/// Cloning is cheap; every clone shares the driver's internal pool.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    client: Client,
    database: Database,
}

impl DocumentStore {
    /// Connect using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connect`] when the connection string is invalid
    /// or the client cannot be constructed.
    pub async fn connect(config: StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|err| StoreError::connect(err.to_string()))?;
        options.app_name = Some(config.app_name.clone());
        options.server_selection_timeout = Some(config.server_selection_timeout);

        let client =
            Client::with_options(options).map_err(|err| StoreError::connect(err.to_string()))?;
        let database = client.database(&config.database);
        Ok(Self { client, database })
    }

    /// Round-trip a ping so startup fails fast on an unreachable server.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|err| StoreError::ping(err.to_string()))
    }

    /// Typed collection handle.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    /// Drain in-flight operations and release the pool.
    pub async fn shutdown(self) {
        let Self { client, .. } = self;
        client.shutdown().await;
    }
}
