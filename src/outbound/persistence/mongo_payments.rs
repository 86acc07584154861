//! Document-store adapter for payment records.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use super::documents::PaymentDocument;
use super::{DocumentStore, map_store_error};
use crate::domain::ports::{NewPayment, PaymentRepository};
use crate::domain::{Error, Identity, PaymentRecord};

const COLLECTION: &str = "payments";

/// Payment-record repository backed by the `payments` collection.
pub struct MongoPaymentRepository {
    collection: Collection<PaymentDocument>,
}

impl MongoPaymentRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl PaymentRepository for MongoPaymentRepository {
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, Error> {
        let document = PaymentDocument::from_new(payment, ObjectId::new().to_hex());
        self.collection
            .insert_one(&document)
            .await
            .map_err(|err| map_store_error("payments.insert", err))?;
        document.into_domain()
    }

    async fn by_payer(&self, payer: &Identity) -> Result<Vec<PaymentRecord>, Error> {
        let cursor = self
            .collection
            .find(doc! { "payer_email": payer.as_ref() })
            .sort(doc! { "created_at_ms": -1 })
            .await
            .map_err(|err| map_store_error("payments.find", err))?;
        let documents: Vec<PaymentDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| map_store_error("payments.cursor", err))?;
        documents
            .into_iter()
            .map(PaymentDocument::into_domain)
            .collect()
    }
}
