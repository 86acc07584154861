//! Outbound adapters for the document store and the payment processor.

pub mod persistence;
pub mod stripe;
