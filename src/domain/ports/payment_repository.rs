//! Payment-record repository port and its in-memory implementation.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::payment::PaymentRecord;
use crate::domain::{Error, Identity};

/// A not-yet-persisted payment record; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub payer_email: Identity,
    pub amount: i64,
    pub currency: String,
    pub intent_id: String,
    pub created_at: DateTime<Utc>,
}

impl NewPayment {
    fn into_record(self, id: String) -> PaymentRecord {
        PaymentRecord {
            id,
            payer_email: self.payer_email,
            amount: self.amount,
            currency: self.currency,
            intent_id: self.intent_id,
            created_at: self.created_at,
        }
    }
}

/// Port for the `payments` collection.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, Error>;

    /// Payments made by the payer, newest first.
    async fn by_payer(&self, payer: &Identity) -> Result<Vec<PaymentRecord>, Error>;
}

/// Deterministic in-memory payment store used by tests and store-less dev
/// runs.
#[derive(Debug, Default)]
pub struct MemoryPaymentRepository {
    records: RwLock<Vec<PaymentRecord>>,
}

fn lock_poisoned() -> Error {
    Error::internal("payment store lock poisoned")
}

#[async_trait]
impl PaymentRepository for MemoryPaymentRepository {
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, Error> {
        let record = payment.into_record(uuid::Uuid::new_v4().simple().to_string());
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        records.push(record.clone());
        Ok(record)
    }

    async fn by_payer(&self, payer: &Identity) -> Result<Vec<PaymentRecord>, Error> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        let mut mine: Vec<PaymentRecord> = records
            .iter()
            .filter(|record| &record.payer_email == payer)
            .cloned()
            .collect();
        mine.sort_by_key(|record| std::cmp::Reverse(record.created_at));
        Ok(mine)
    }
}
