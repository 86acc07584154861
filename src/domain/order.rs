//! Customer order model.
//!
//! Orders denormalise the food name, image, and price at purchase time so
//! later listing edits do not rewrite order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::Identity;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Catalogue document this order was placed against.
    pub food_id: String,
    pub food_name: String,
    pub food_image: String,
    /// Unit price in minor currency units at purchase time.
    pub price: i64,
    pub quantity: i64,
    /// Buyer identity; compared against the credential on reads and cancel.
    #[schema(value_type = String, example = "ada@example.com")]
    pub buyer_email: Identity,
    pub buyer_name: String,
    /// Vendor identity of the ordered listing.
    #[schema(value_type = String, example = "vendor@example.com")]
    pub vendor_email: Identity,
    pub ordered_at: DateTime<Utc>,
}
