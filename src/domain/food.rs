//! Food item catalogue model.
//!
//! Documents are owned by the vendor identity; the access-control guard only
//! ever looks at that field, the rest is catalogue payload. Prices are in
//! minor currency units.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::Identity;

/// A vendor's listed food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Document id assigned by the store.
    pub id: String,
    pub name: String,
    /// Image URL shown in listings.
    pub image: String,
    pub category: String,
    /// Price in minor currency units.
    #[schema(example = 1250)]
    pub price: i64,
    /// Portions currently available.
    pub quantity: i64,
    pub description: String,
    /// Owner identity; compared against the credential on mutations.
    #[schema(value_type = String, example = "vendor@example.com")]
    pub vendor_email: Identity,
    pub vendor_name: String,
    /// Portions sold so far; drives the top-sellers listing.
    pub purchase_count: i64,
}

/// Fields a vendor may change on an existing listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl FoodItemUpdate {
    /// True when no field is set; handlers reject these early.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.description.is_none()
    }
}

/// Sort order for the public catalogue listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FoodSort {
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Insertion order, no sort stage.
    #[default]
    Unsorted,
}

/// Naive skip/limit page over the catalogue with its total match count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodPage {
    pub items: Vec<FoodItem>,
    /// Total documents matching the filter, ignoring pagination.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_emptiness_tracks_fields() {
        assert!(FoodItemUpdate::default().is_empty());
        let update = FoodItemUpdate {
            price: Some(900),
            ..FoodItemUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn food_item_serialises_camel_case() {
        let item = FoodItem {
            id: "66b2".into(),
            name: "Shorshe Ilish".into(),
            image: "https://img.example.com/ilish.png".into(),
            category: "Fish".into(),
            price: 1250,
            quantity: 4,
            description: "Hilsa in mustard sauce".into(),
            vendor_email: Identity::new("vendor@example.com").expect("identity"),
            vendor_name: "Arnab".into(),
            purchase_count: 7,
        };
        let value = serde_json::to_value(&item).expect("serialise");
        assert_eq!(value["vendorEmail"], "vendor@example.com");
        assert_eq!(value["purchaseCount"], 7);
    }
}
