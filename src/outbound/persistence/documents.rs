//! Stored document shapes and their domain conversions.
//!
//! Documents keep the store's naming (`_id`, epoch-millisecond instants)
//! out of the domain models. Conversion back into the domain re-validates
//! identity fields, so a hand-edited document surfaces as an internal error
//! instead of leaking an invalid identity into ownership checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{NewFeedback, NewFoodItem, NewOrder, NewPayment};
use crate::domain::{Error, Feedback, FoodItem, Identity, Order, PaymentRecord};

fn stored_identity(raw: String, field: &'static str) -> Result<Identity, Error> {
    Identity::new(raw).map_err(|error| Error::internal(format!("stored {field} invalid: {error}")))
}

fn stored_instant(millis: i64, field: &'static str) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::internal(format!("stored {field} out of range")))
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FoodDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
    pub vendor_email: String,
    pub vendor_name: String,
    pub purchase_count: i64,
}

impl FoodDocument {
    pub fn from_new(food: NewFoodItem, id: String) -> Self {
        Self {
            id,
            name: food.name,
            image: food.image,
            category: food.category,
            price: food.price,
            quantity: food.quantity,
            description: food.description,
            vendor_email: food.vendor_email.into(),
            vendor_name: food.vendor_name,
            purchase_count: 0,
        }
    }

    pub fn into_domain(self) -> Result<FoodItem, Error> {
        Ok(FoodItem {
            id: self.id,
            name: self.name,
            image: self.image,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            vendor_email: stored_identity(self.vendor_email, "vendor identity")?,
            vendor_name: self.vendor_name,
            purchase_count: self.purchase_count,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub food_id: String,
    pub food_name: String,
    pub food_image: String,
    pub price: i64,
    pub quantity: i64,
    pub buyer_email: String,
    pub buyer_name: String,
    pub vendor_email: String,
    pub ordered_at_ms: i64,
}

impl OrderDocument {
    pub fn from_new(order: NewOrder, id: String) -> Self {
        Self {
            id,
            food_id: order.food_id,
            food_name: order.food_name,
            food_image: order.food_image,
            price: order.price,
            quantity: order.quantity,
            buyer_email: order.buyer_email.into(),
            buyer_name: order.buyer_name,
            vendor_email: order.vendor_email.into(),
            ordered_at_ms: order.ordered_at.timestamp_millis(),
        }
    }

    pub fn into_domain(self) -> Result<Order, Error> {
        Ok(Order {
            id: self.id,
            food_id: self.food_id,
            food_name: self.food_name,
            food_image: self.food_image,
            price: self.price,
            quantity: self.quantity,
            buyer_email: stored_identity(self.buyer_email, "buyer identity")?,
            buyer_name: self.buyer_name,
            vendor_email: stored_identity(self.vendor_email, "vendor identity")?,
            ordered_at: stored_instant(self.ordered_at_ms, "order instant")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FeedbackDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub author_email: String,
    pub author_name: String,
    pub message: String,
    pub rating: i32,
    pub created_at_ms: i64,
}

impl FeedbackDocument {
    pub fn from_new(feedback: NewFeedback, id: String) -> Self {
        Self {
            id,
            author_email: feedback.author_email.into(),
            author_name: feedback.author_name,
            message: feedback.message,
            rating: feedback.rating,
            created_at_ms: feedback.created_at.timestamp_millis(),
        }
    }

    pub fn into_domain(self) -> Result<Feedback, Error> {
        Ok(Feedback {
            id: self.id,
            author_email: stored_identity(self.author_email, "author identity")?,
            author_name: self.author_name,
            message: self.message,
            rating: self.rating,
            created_at: stored_instant(self.created_at_ms, "feedback instant")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PaymentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub payer_email: String,
    pub amount: i64,
    pub currency: String,
    pub intent_id: String,
    pub created_at_ms: i64,
}

impl PaymentDocument {
    pub fn from_new(payment: NewPayment, id: String) -> Self {
        Self {
            id,
            payer_email: payment.payer_email.into(),
            amount: payment.amount,
            currency: payment.currency,
            intent_id: payment.intent_id,
            created_at_ms: payment.created_at.timestamp_millis(),
        }
    }

    pub fn into_domain(self) -> Result<PaymentRecord, Error> {
        Ok(PaymentRecord {
            id: self.id,
            payer_email: stored_identity(self.payer_email, "payer identity")?,
            amount: self.amount,
            currency: self.currency,
            intent_id: self.intent_id,
            created_at: stored_instant(self.created_at_ms, "payment instant")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn food_round_trip_preserves_fields() {
        let new = NewFoodItem {
            name: "Khichuri".into(),
            image: "https://img.example.com/khichuri.png".into(),
            category: "Rice".into(),
            price: 500,
            quantity: 12,
            description: "rainy day food".into(),
            vendor_email: Identity::new("vendor@example.com").expect("identity"),
            vendor_name: "Arnab".into(),
        };
        let item = FoodDocument::from_new(new, "abc123".into())
            .into_domain()
            .expect("convert");
        assert_eq!(item.id, "abc123");
        assert_eq!(item.purchase_count, 0);
        assert_eq!(item.vendor_email.as_ref(), "vendor@example.com");
    }

    #[test]
    fn corrupt_stored_identity_surfaces_as_internal() {
        let document = FoodDocument {
            id: "abc123".into(),
            name: "Khichuri".into(),
            image: String::new(),
            category: String::new(),
            price: 500,
            quantity: 12,
            description: String::new(),
            vendor_email: "not-an-email".into(),
            vendor_name: String::new(),
            purchase_count: 0,
        };
        let error = document.into_domain().expect_err("must fail");
        assert_eq!(error.code(), ErrorCode::Internal);
    }

    #[test]
    fn document_id_serialises_under_the_store_key() {
        let document = PaymentDocument {
            id: "pay1".into(),
            payer_email: "ada@example.com".into(),
            amount: 1250,
            currency: "usd".into(),
            intent_id: "pi_1".into(),
            created_at_ms: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&document).expect("serialise");
        assert_eq!(value["_id"], "pay1");
        assert!(value.get("id").is_none());
    }
}
