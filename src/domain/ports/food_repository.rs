//! Catalogue repository port and its in-memory implementation.

use std::sync::RwLock;

use async_trait::async_trait;
use regex::Regex;

use crate::domain::food::{FoodItem, FoodItemUpdate, FoodPage, FoodSort};
use crate::domain::{Error, Identity};

/// A not-yet-persisted listing; the repository assigns the id and starts the
/// purchase count at zero.
#[derive(Debug, Clone)]
pub struct NewFoodItem {
    pub name: String,
    pub image: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
    pub vendor_email: Identity,
    pub vendor_name: String,
}

impl NewFoodItem {
    fn into_item(self, id: String) -> FoodItem {
        FoodItem {
            id,
            name: self.name,
            image: self.image,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            vendor_email: self.vendor_email,
            vendor_name: self.vendor_name,
            purchase_count: 0,
        }
    }
}

/// Filter, sort, and skip/limit window for the public catalogue listing.
#[derive(Debug, Clone, Default)]
pub struct FoodPageQuery {
    /// Case-insensitive regex matched against the name.
    pub search: Option<String>,
    pub sort: FoodSort,
    pub skip: u64,
    pub limit: i64,
}

/// Port for the `foods` collection.
#[async_trait]
pub trait FoodRepository: Send + Sync {
    async fn insert(&self, food: NewFoodItem) -> Result<FoodItem, Error>;

    /// Page through the catalogue with the total match count.
    async fn page(&self, query: FoodPageQuery) -> Result<FoodPage, Error>;

    /// Best-selling items by purchase count, descending.
    async fn top_sellers(&self, limit: i64) -> Result<Vec<FoodItem>, Error>;

    async fn by_id(&self, id: &str) -> Result<FoodItem, Error>;

    async fn by_vendor(&self, vendor: &Identity) -> Result<Vec<FoodItem>, Error>;

    /// Apply `changes` to the vendor's own listing. A wrong vendor identity
    /// behaves like a missing document.
    async fn update(
        &self,
        id: &str,
        vendor: &Identity,
        changes: FoodItemUpdate,
    ) -> Result<FoodItem, Error>;

    /// Remove the vendor's own listing; wrong vendor behaves like missing.
    async fn delete(&self, id: &str, vendor: &Identity) -> Result<(), Error>;

    /// Shift availability and purchase count after an order is placed or
    /// cancelled.
    async fn adjust_counters(
        &self,
        id: &str,
        quantity_delta: i64,
        purchase_delta: i64,
    ) -> Result<(), Error>;
}

/// Deterministic in-memory catalogue used by tests and store-less dev runs.
#[derive(Debug, Default)]
pub struct MemoryFoodRepository {
    items: RwLock<Vec<FoodItem>>,
}

impl MemoryFoodRepository {
    /// Seed the repository with existing items.
    pub fn with_items(items: Vec<FoodItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

fn lock_poisoned() -> Error {
    Error::internal("food store lock poisoned")
}

fn search_regex(raw: &str) -> Result<Regex, Error> {
    Regex::new(&format!("(?i){raw}"))
        .map_err(|_| Error::invalid_request("search is not a valid pattern"))
}

#[async_trait]
impl FoodRepository for MemoryFoodRepository {
    async fn insert(&self, food: NewFoodItem) -> Result<FoodItem, Error> {
        let item = food.into_item(uuid::Uuid::new_v4().simple().to_string());
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        items.push(item.clone());
        Ok(item)
    }

    async fn page(&self, query: FoodPageQuery) -> Result<FoodPage, Error> {
        let filter = query.search.as_deref().map(search_regex).transpose()?;
        let items = self.items.read().map_err(|_| lock_poisoned())?;

        let mut matched: Vec<FoodItem> = items
            .iter()
            .filter(|item| {
                filter
                    .as_ref()
                    .is_none_or(|regex| regex.is_match(&item.name))
            })
            .cloned()
            .collect();
        match query.sort {
            FoodSort::PriceAsc => matched.sort_by_key(|item| item.price),
            FoodSort::PriceDesc => matched.sort_by_key(|item| std::cmp::Reverse(item.price)),
            FoodSort::Unsorted => {}
        }

        let total = matched.len() as u64;
        let window: Vec<FoodItem> = matched
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .collect();
        Ok(FoodPage {
            items: window,
            total,
        })
    }

    async fn top_sellers(&self, limit: i64) -> Result<Vec<FoodItem>, Error> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        let mut ranked: Vec<FoodItem> = items.iter().cloned().collect();
        ranked.sort_by_key(|item| std::cmp::Reverse(item.purchase_count));
        ranked.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(ranked)
    }

    async fn by_id(&self, id: &str) -> Result<FoodItem, Error> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("food item not found"))
    }

    async fn by_vendor(&self, vendor: &Identity) -> Result<Vec<FoodItem>, Error> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items
            .iter()
            .filter(|item| &item.vendor_email == vendor)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &str,
        vendor: &Identity,
        changes: FoodItemUpdate,
    ) -> Result<FoodItem, Error> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id && &item.vendor_email == vendor)
            .ok_or_else(|| Error::not_found("food item not found"))?;
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(image) = changes.image {
            item.image = image;
        }
        if let Some(category) = changes.category {
            item.category = category;
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        Ok(item.clone())
    }

    async fn delete(&self, id: &str, vendor: &Identity) -> Result<(), Error> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let before = items.len();
        items.retain(|item| !(item.id == id && &item.vendor_email == vendor));
        if items.len() == before {
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
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| Error::not_found("food item not found"))?;
        item.quantity += quantity_delta;
        item.purchase_count += purchase_delta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn vendor() -> Identity {
        Identity::new("vendor@example.com").expect("identity")
    }

    fn listing(name: &str, price: i64) -> NewFoodItem {
        NewFoodItem {
            name: name.into(),
            image: "https://img.example.com/x.png".into(),
            category: "Curry".into(),
            price,
            quantity: 10,
            description: "test".into(),
            vendor_email: vendor(),
            vendor_name: "Arnab".into(),
        }
    }

    async fn seeded() -> MemoryFoodRepository {
        let repo = MemoryFoodRepository::default();
        for (name, price) in [("Kacchi Biryani", 1600), ("Beef Tehari", 900), ("Khichuri", 500)] {
            repo.insert(listing(name, price)).await.expect("insert");
        }
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn page_filters_by_case_insensitive_regex() {
        let repo = seeded().await;
        let page = repo
            .page(FoodPageQuery {
                search: Some("biry".into()),
                sort: FoodSort::Unsorted,
                skip: 0,
                limit: 10,
            })
            .await
            .expect("page");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Kacchi Biryani");
    }

    #[rstest]
    #[tokio::test]
    async fn page_sorts_and_windows() {
        let repo = seeded().await;
        let page = repo
            .page(FoodPageQuery {
                search: None,
                sort: FoodSort::PriceAsc,
                skip: 1,
                limit: 1,
            })
            .await
            .expect("page");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].price, 900);
    }

    #[rstest]
    #[tokio::test]
    async fn update_scoped_to_wrong_vendor_is_not_found() {
        let repo = seeded().await;
        let id = repo.by_vendor(&vendor()).await.expect("list")[0].id.clone();
        let other = Identity::new("other@example.com").expect("identity");
        let error = repo
            .update(&id, &other, FoodItemUpdate::default())
            .await
            .expect_err("must miss");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn counters_shift_quantity_and_purchases() {
        let repo = seeded().await;
        let id = repo.by_vendor(&vendor()).await.expect("list")[0].id.clone();
        repo.adjust_counters(&id, -2, 2).await.expect("adjust");
        let item = repo.by_id(&id).await.expect("fetch");
        assert_eq!(item.quantity, 8);
        assert_eq!(item.purchase_count, 2);
    }
}
