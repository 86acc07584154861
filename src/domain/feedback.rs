//! Customer feedback model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::Identity;

/// Lowest accepted rating.
pub const RATING_MIN: i32 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i32 = 5;

/// A feedback entry shown on the public wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    /// Author identity; compared against the credential on deletion.
    #[schema(value_type = String, example = "ada@example.com")]
    pub author_email: Identity,
    pub author_name: String,
    pub message: String,
    /// Rating between [`RATING_MIN`] and [`RATING_MAX`] inclusive.
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}
