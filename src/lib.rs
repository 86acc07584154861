//! Dine Portal backend library modules.
//!
//! The crate follows a ports-and-adapters split: `domain` holds the models,
//! error taxonomy, and repository ports; `inbound::http` maps HTTP requests
//! onto them; `outbound` provides the document-store and payment-processor
//! adapters; `server` wires everything into an Actix application.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::trace::Trace;
