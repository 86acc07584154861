//! Document-store adapter for the feedback wall.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use super::documents::FeedbackDocument;
use super::{DocumentStore, map_store_error};
use crate::domain::ports::{FeedbackRepository, NewFeedback};
use crate::domain::{Error, Feedback, Identity};

const COLLECTION: &str = "feedback";

/// Feedback repository backed by the `feedback` collection.
pub struct MongoFeedbackRepository {
    collection: Collection<FeedbackDocument>,
}

impl MongoFeedbackRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl FeedbackRepository for MongoFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, Error> {
        let document = FeedbackDocument::from_new(feedback, ObjectId::new().to_hex());
        self.collection
            .insert_one(&document)
            .await
            .map_err(|err| map_store_error("feedback.insert", err))?;
        document.into_domain()
    }

    async fn page(&self, skip: u64, limit: i64) -> Result<Vec<Feedback>, Error> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at_ms": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|err| map_store_error("feedback.find", err))?;
        let documents: Vec<FeedbackDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| map_store_error("feedback.cursor", err))?;
        documents
            .into_iter()
            .map(FeedbackDocument::into_domain)
            .collect()
    }

    async fn delete(&self, id: &str, author: &Identity) -> Result<(), Error> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "author_email": author.as_ref() })
            .await
            .map_err(|err| map_store_error("feedback.delete", err))?;
        if result.deleted_count == 0 {
            return Err(Error::not_found("feedback not found"));
        }
        Ok(())
    }
}
