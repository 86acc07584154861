//! Document-store adapter for orders.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use super::documents::OrderDocument;
use super::{DocumentStore, map_store_error};
use crate::domain::ports::{NewOrder, OrderRepository};
use crate::domain::{Error, Identity, Order};

const COLLECTION: &str = "orders";

/// Order repository backed by the `orders` collection.
pub struct MongoOrderRepository {
    collection: Collection<OrderDocument>,
}

impl MongoOrderRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, Error> {
        let document = OrderDocument::from_new(order, ObjectId::new().to_hex());
        self.collection
            .insert_one(&document)
            .await
            .map_err(|err| map_store_error("orders.insert", err))?;
        document.into_domain()
    }

    async fn by_buyer(&self, buyer: &Identity) -> Result<Vec<Order>, Error> {
        let cursor = self
            .collection
            .find(doc! { "buyer_email": buyer.as_ref() })
            .sort(doc! { "ordered_at_ms": -1 })
            .await
            .map_err(|err| map_store_error("orders.find", err))?;
        let documents: Vec<OrderDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| map_store_error("orders.cursor", err))?;
        documents
            .into_iter()
            .map(OrderDocument::into_domain)
            .collect()
    }

    async fn delete(&self, id: &str, buyer: &Identity) -> Result<Order, Error> {
        let document = self
            .collection
            .find_one_and_delete(doc! { "_id": id, "buyer_email": buyer.as_ref() })
            .await
            .map_err(|err| map_store_error("orders.delete", err))?
            .ok_or_else(|| Error::not_found("order not found"))?;
        document.into_domain()
    }
}
