//! Feedback repository port and its in-memory implementation.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::feedback::Feedback;
use crate::domain::{Error, Identity};

/// A not-yet-persisted feedback entry; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub author_email: Identity,
    pub author_name: String,
    pub message: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl NewFeedback {
    fn into_feedback(self, id: String) -> Feedback {
        Feedback {
            id,
            author_email: self.author_email,
            author_name: self.author_name,
            message: self.message,
            rating: self.rating,
            created_at: self.created_at,
        }
    }
}

/// Port for the `feedback` collection.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, Error>;

    /// Public wall, newest first, naive skip/limit.
    async fn page(&self, skip: u64, limit: i64) -> Result<Vec<Feedback>, Error>;

    /// Remove the author's own entry; wrong author behaves like missing.
    async fn delete(&self, id: &str, author: &Identity) -> Result<(), Error>;
}

/// Deterministic in-memory feedback store used by tests and store-less dev
/// runs.
#[derive(Debug, Default)]
pub struct MemoryFeedbackRepository {
    entries: RwLock<Vec<Feedback>>,
}

fn lock_poisoned() -> Error {
    Error::internal("feedback store lock poisoned")
}

#[async_trait]
impl FeedbackRepository for MemoryFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, Error> {
        let entry = feedback.into_feedback(uuid::Uuid::new_v4().simple().to_string());
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn page(&self, skip: u64, limit: i64) -> Result<Vec<Feedback>, Error> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        let mut wall: Vec<Feedback> = entries.iter().cloned().collect();
        wall.sort_by_key(|entry| std::cmp::Reverse(entry.created_at));
        Ok(wall
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn delete(&self, id: &str, author: &Identity) -> Result<(), Error> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        let before = entries.len();
        entries.retain(|entry| !(entry.id == id && &entry.author_email == author));
        if entries.len() == before {
            return Err(Error::not_found("feedback not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn page_returns_newest_first() {
        let repo = MemoryFeedbackRepository::default();
        let base = Utc::now();
        for (offset, message) in [(2, "oldest"), (0, "newest"), (1, "middle")] {
            repo.insert(NewFeedback {
                author_email: Identity::new("ada@example.com").expect("identity"),
                author_name: "Ada".into(),
                message: message.into(),
                rating: 5,
                created_at: base - Duration::minutes(offset),
            })
            .await
            .expect("insert");
        }

        let wall = repo.page(0, 2).await.expect("page");
        assert_eq!(wall.len(), 2);
        assert_eq!(wall[0].message, "newest");
        assert_eq!(wall[1].message, "middle");
    }
}
