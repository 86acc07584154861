//! Repository and gateway ports.
//!
//! Inbound HTTP handlers depend on these traits only; production backs them
//! with document-store and payment-processor adapters from `outbound`, and
//! tests (or a store-less dev run) use the deterministic in-memory
//! implementations that live alongside each port.

pub mod feedback_repository;
pub mod food_repository;
pub mod order_repository;
pub mod payment_gateway;
pub mod payment_repository;

pub use self::feedback_repository::{FeedbackRepository, MemoryFeedbackRepository, NewFeedback};
pub use self::food_repository::{
    FoodPageQuery, FoodRepository, MemoryFoodRepository, NewFoodItem,
};
pub use self::order_repository::{MemoryOrderRepository, NewOrder, OrderRepository};
pub use self::payment_gateway::{FixturePaymentGateway, PaymentGateway};
pub use self::payment_repository::{MemoryPaymentRepository, NewPayment, PaymentRepository};
