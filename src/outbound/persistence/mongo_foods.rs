//! Document-store adapter for the catalogue.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};

use super::documents::FoodDocument;
use super::{DocumentStore, map_store_error};
use crate::domain::ports::{FoodPageQuery, FoodRepository, NewFoodItem};
use crate::domain::{Error, FoodItem, FoodItemUpdate, FoodPage, FoodSort, Identity};

const COLLECTION: &str = "foods";

/// Catalogue repository backed by the `foods` collection.
pub struct MongoFoodRepository {
    collection: Collection<FoodDocument>,
}

impl MongoFoodRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(COLLECTION),
        }
    }

    async fn collect(
        &self,
        filter: Document,
        sort: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<FoodItem>, Error> {
        let mut find = self.collection.find(filter).skip(skip).limit(limit);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        let cursor = find
            .await
            .map_err(|err| map_store_error("foods.find", err))?;
        let documents: Vec<FoodDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| map_store_error("foods.cursor", err))?;
        documents
            .into_iter()
            .map(FoodDocument::into_domain)
            .collect()
    }
}

fn search_filter(query: &FoodPageQuery) -> Document {
    match &query.search {
        Some(pattern) => doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
        None => doc! {},
    }
}

fn sort_stage(sort: FoodSort) -> Option<Document> {
    match sort {
        FoodSort::PriceAsc => Some(doc! { "price": 1 }),
        FoodSort::PriceDesc => Some(doc! { "price": -1 }),
        FoodSort::Unsorted => None,
    }
}

fn update_stage(changes: &FoodItemUpdate) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.name {
        set.insert("name", name.as_str());
    }
    if let Some(image) = &changes.image {
        set.insert("image", image.as_str());
    }
    if let Some(category) = &changes.category {
        set.insert("category", category.as_str());
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(quantity) = changes.quantity {
        set.insert("quantity", quantity);
    }
    if let Some(description) = &changes.description {
        set.insert("description", description.as_str());
    }
    doc! { "$set": set }
}

#[async_trait]
impl FoodRepository for MongoFoodRepository {
    async fn insert(&self, food: NewFoodItem) -> Result<FoodItem, Error> {
        let document = FoodDocument::from_new(food, ObjectId::new().to_hex());
        self.collection
            .insert_one(&document)
            .await
            .map_err(|err| map_store_error("foods.insert", err))?;
        document.into_domain()
    }

    async fn page(&self, query: FoodPageQuery) -> Result<FoodPage, Error> {
        let filter = search_filter(&query);
        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(|err| map_store_error("foods.count", err))?;
        let items = self
            .collect(filter, sort_stage(query.sort), query.skip, query.limit)
            .await?;
        Ok(FoodPage { items, total })
    }

    async fn top_sellers(&self, limit: i64) -> Result<Vec<FoodItem>, Error> {
        self.collect(doc! {}, Some(doc! { "purchase_count": -1 }), 0, limit)
            .await
    }

    async fn by_id(&self, id: &str) -> Result<FoodItem, Error> {
        let document = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|err| map_store_error("foods.find_one", err))?
            .ok_or_else(|| Error::not_found("food item not found"))?;
        document.into_domain()
    }

    async fn by_vendor(&self, vendor: &Identity) -> Result<Vec<FoodItem>, Error> {
        let cursor = self
            .collection
            .find(doc! { "vendor_email": vendor.as_ref() })
            .await
            .map_err(|err| map_store_error("foods.find", err))?;
        let documents: Vec<FoodDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| map_store_error("foods.cursor", err))?;
        documents
            .into_iter()
            .map(FoodDocument::into_domain)
            .collect()
    }

    async fn update(
        &self,
        id: &str,
        vendor: &Identity,
        changes: FoodItemUpdate,
    ) -> Result<FoodItem, Error> {
        let filter = doc! { "_id": id, "vendor_email": vendor.as_ref() };
        let result = self
            .collection
            .update_one(filter.clone(), update_stage(&changes))
            .await
            .map_err(|err| map_store_error("foods.update", err))?;
        if result.matched_count == 0 {
            return Err(Error::not_found("food item not found"));
        }
        let document = self
            .collection
            .find_one(filter)
            .await
            .map_err(|err| map_store_error("foods.find_one", err))?
            .ok_or_else(|| Error::not_found("food item not found"))?;
        document.into_domain()
    }

    async fn delete(&self, id: &str, vendor: &Identity) -> Result<(), Error> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "vendor_email": vendor.as_ref() })
            .await
            .map_err(|err| map_store_error("foods.delete", err))?;
        if result.deleted_count == 0 {
            return Err(Error::not_found("food item not found"));
        }
        Ok(())
    }

    async fn adjust_counters(
        &self,
        id: &str,
        quantity_delta: i64,
        purchase_delta: i64,
    ) -> Result<(), Error> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "quantity": quantity_delta, "purchase_count": purchase_delta } },
            )
            .await
            .map_err(|err| map_store_error("foods.adjust", err))?;
        if result.matched_count == 0 {
            return Err(Error::not_found("food item not found"));
        }
        Ok(())
    }
}
