//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend on the
//! domain ports and guard settings only and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FeedbackRepository, FixturePaymentGateway, FoodRepository, MemoryFeedbackRepository,
    MemoryFoodRepository, MemoryOrderRepository, MemoryPaymentRepository, OrderRepository,
    PaymentGateway, PaymentRepository,
};
use crate::inbound::http::guard::GuardSettings;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub guard: GuardSettings,
    pub foods: Arc<dyn FoodRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
}

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub foods: Arc<dyn FoodRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl HttpState {
    /// Construct state from guard settings and a ports bundle.
    pub fn new(guard: GuardSettings, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            foods,
            orders,
            feedback,
            payments,
            gateway,
        } = ports;
        Self {
            guard,
            foods,
            orders,
            feedback,
            payments,
            gateway,
        }
    }

    /// State backed entirely by in-memory fixtures, used by tests and by
    /// store-less development runs.
    pub fn in_memory(guard: GuardSettings) -> Self {
        Self::new(
            guard,
            HttpStatePorts {
                foods: Arc::new(MemoryFoodRepository::default()),
                orders: Arc::new(MemoryOrderRepository::default()),
                feedback: Arc::new(MemoryFeedbackRepository::default()),
                payments: Arc::new(MemoryPaymentRepository::default()),
                gateway: Arc::new(FixturePaymentGateway),
            },
        )
    }
}
