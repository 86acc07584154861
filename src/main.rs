//! Backend entry-point: configuration, store lifecycle, and graceful drain.

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dine_portal_backend::config::{self, BuildMode};
use dine_portal_backend::inbound::http::guard::GuardSettings;
use dine_portal_backend::inbound::http::health::HealthState;
use dine_portal_backend::outbound::persistence::{DocumentStore, StoreConfig};
use dine_portal_backend::server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let app_config = config::app_config_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let store = match &app_config.database {
        Some(settings) => {
            let store = DocumentStore::connect(StoreConfig::new(
                settings.url.as_str(),
                settings.name.as_str(),
            ))
            .await
            .map_err(std::io::Error::other)?;
            store.ping().await.map_err(std::io::Error::other)?;
            info!(database = %settings.name, "document store connected");
            Some(store)
        }
        None => None,
    };

    let guard = GuardSettings {
        secret: app_config.secret.clone(),
        cookies: app_config.deployment.cookie_policy(),
    };
    let mut server_config = ServerConfig::new(app_config.bind_addr, guard);
    if let Some(store) = store.clone() {
        server_config = server_config.with_store(store);
    }
    if let Some(key) = app_config.stripe_secret_key.clone() {
        server_config = server_config.with_stripe_key(key);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), server_config)?;
    info!(addr = %app_config.bind_addr, "server listening");

    let handle = server.handle();
    let drain_health = health_state.clone();
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("termination signal received; draining");
        drain_health.mark_unhealthy();
        handle.stop(true).await;
    });

    server.await?;

    if let Some(store) = store {
        store.shutdown().await;
    }
    info!("shutdown complete");
    Ok(())
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable; waiting on ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
