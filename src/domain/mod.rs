//! Domain models, error taxonomy, and repository ports.
//!
//! Types here are transport agnostic: the HTTP adapter maps them onto JSON
//! envelopes and status codes, the persistence adapters onto documents.

pub mod credential;
pub mod error;
pub mod feedback;
pub mod food;
pub mod identity;
pub mod order;
pub mod payment;
pub mod ports;

pub use self::credential::{CredentialError, SigningSecret, TOKEN_TTL_DAYS};
pub use self::error::{Error, ErrorCode};
pub use self::feedback::Feedback;
pub use self::food::{FoodItem, FoodItemUpdate, FoodPage, FoodSort};
pub use self::identity::{Identity, IdentityValidationError};
pub use self::order::Order;
pub use self::payment::{PaymentIntent, PaymentRecord};
