//! Order repository port and its in-memory implementation.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::order::Order;
use crate::domain::{Error, Identity};

/// A not-yet-persisted order; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub food_id: String,
    pub food_name: String,
    pub food_image: String,
    pub price: i64,
    pub quantity: i64,
    pub buyer_email: Identity,
    pub buyer_name: String,
    pub vendor_email: Identity,
    pub ordered_at: DateTime<Utc>,
}

impl NewOrder {
    fn into_order(self, id: String) -> Order {
        Order {
            id,
            food_id: self.food_id,
            food_name: self.food_name,
            food_image: self.food_image,
            price: self.price,
            quantity: self.quantity,
            buyer_email: self.buyer_email,
            buyer_name: self.buyer_name,
            vendor_email: self.vendor_email,
            ordered_at: self.ordered_at,
        }
    }
}

/// Port for the `orders` collection.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: NewOrder) -> Result<Order, Error>;

    /// Orders placed by the buyer, newest first.
    async fn by_buyer(&self, buyer: &Identity) -> Result<Vec<Order>, Error>;

    /// Remove the buyer's own order and return it so the caller can restore
    /// catalogue counters. A wrong buyer identity behaves like a missing
    /// document.
    async fn delete(&self, id: &str, buyer: &Identity) -> Result<Order, Error>;
}

/// Deterministic in-memory order store used by tests and store-less dev runs.
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

fn lock_poisoned() -> Error {
    Error::internal("order store lock poisoned")
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, Error> {
        let order = order.into_order(uuid::Uuid::new_v4().simple().to_string());
        let mut orders = self.orders.write().map_err(|_| lock_poisoned())?;
        orders.push(order.clone());
        Ok(order)
    }

    async fn by_buyer(&self, buyer: &Identity) -> Result<Vec<Order>, Error> {
        let orders = self.orders.read().map_err(|_| lock_poisoned())?;
        let mut mine: Vec<Order> = orders
            .iter()
            .filter(|order| &order.buyer_email == buyer)
            .cloned()
            .collect();
        mine.sort_by_key(|order| std::cmp::Reverse(order.ordered_at));
        Ok(mine)
    }

    async fn delete(&self, id: &str, buyer: &Identity) -> Result<Order, Error> {
        let mut orders = self.orders.write().map_err(|_| lock_poisoned())?;
        let position = orders
            .iter()
            .position(|order| order.id == id && &order.buyer_email == buyer)
            .ok_or_else(|| Error::not_found("order not found"))?;
        Ok(orders.remove(position))
    }
}
