//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::ApiDoc;
use crate::Trace;
use crate::domain::ports::{FixturePaymentGateway, PaymentGateway};
use crate::inbound::http::feedback::{create_feedback, delete_feedback, list_feedback};
use crate::inbound::http::foods::{
    create_food, delete_food, get_food, list_foods, top_foods, update_food, vendor_foods,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::orders::{cancel_order, list_orders, place_order};
use crate::inbound::http::payments::{create_payment_intent, list_payments, record_payment};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::tokens::{issue_token, logout};
use crate::outbound::persistence::{
    MongoFeedbackRepository, MongoFoodRepository, MongoOrderRepository, MongoPaymentRepository,
};
use crate::outbound::stripe::StripeGateway;

fn build_gateway(config: &ServerConfig) -> std::io::Result<Arc<dyn PaymentGateway>> {
    match &config.stripe_key {
        Some(key) => {
            let gateway = StripeGateway::new(key.clone())
                .map_err(|err| std::io::Error::other(format!("stripe client failed: {err}")))?;
            Ok(Arc::new(gateway))
        }
        None => {
            warn!("no payment-processor key configured; using the fixture gateway");
            Ok(Arc::new(FixturePaymentGateway))
        }
    }
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let gateway = build_gateway(config)?;
    let state = match &config.store {
        Some(store) => HttpState::new(
            config.guard.clone(),
            HttpStatePorts {
                foods: Arc::new(MongoFoodRepository::new(store)),
                orders: Arc::new(MongoOrderRepository::new(store)),
                feedback: Arc::new(MongoFeedbackRepository::new(store)),
                payments: Arc::new(MongoPaymentRepository::new(store)),
                gateway,
            },
        ),
        None => {
            warn!("no document store configured; using in-memory fixtures");
            let memory = HttpState::in_memory(config.guard.clone());
            HttpState::new(
                config.guard.clone(),
                HttpStatePorts {
                    foods: memory.foods,
                    orders: memory.orders,
                    feedback: memory.feedback,
                    payments: memory.payments,
                    gateway,
                },
            )
        }
    };
    Ok(state)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(issue_token)
        .service(logout)
        // Literal food segments must register ahead of the id capture.
        .service(top_foods)
        .service(vendor_foods)
        .service(list_foods)
        .service(get_food)
        .service(create_food)
        .service(update_food)
        .service(delete_food)
        .service(place_order)
        .service(list_orders)
        .service(cancel_order)
        .service(list_feedback)
        .service(create_feedback)
        .service(delete_feedback)
        .service(create_payment_intent)
        .service(record_payment)
        .service(list_payments)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the processor client cannot be built
/// or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let server_health_state = health_state.clone();

    // The binary owns the drain sequence, so Actix's own signal handling
    // stays off.
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
