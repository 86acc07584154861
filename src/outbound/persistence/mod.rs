//! Document-store adapters.
//!
//! One process-wide [`DocumentStore`] is created at startup and injected into
//! the repositories; the driver's `Client` maintains its own connection pool
//! internally. Each repository owns a typed collection handle and maps driver
//! failures into the domain taxonomy.

mod documents;
mod mongo_feedback;
mod mongo_foods;
mod mongo_orders;
mod mongo_payments;
mod store;

pub use mongo_feedback::MongoFeedbackRepository;
pub use mongo_foods::MongoFoodRepository;
pub use mongo_orders::MongoOrderRepository;
pub use mongo_payments::MongoPaymentRepository;
pub use store::{DocumentStore, StoreConfig, StoreError};

use tracing::error;

use crate::domain::Error;

/// Map a driver failure to a generic upstream error, logging the detail.
pub(crate) fn map_store_error(context: &'static str, err: mongodb::error::Error) -> Error {
    error!(error = %err, context, "document store operation failed");
    Error::upstream("data store operation failed")
}
