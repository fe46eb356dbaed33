// services/transaction_log.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::Result;
use crate::models::transaction::{CompletedPayment, Transaction, TransactionStatus};
use crate::storage::KeyValueStore;

pub const TRANSACTIONS_KEY: &str = "transactions";

/// Append-only list of finished payments, newest first.
///
/// Every append rewrites the whole list to the backing store. The list is
/// read back once, in [`TransactionLog::load`].
pub struct TransactionLog {
    store: Arc<dyn KeyValueStore>,
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    /// Corrupted or unreadable data yields an empty log.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let transactions = match store.get(TRANSACTIONS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Transaction>>(&raw) {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!("Error parsing transactions, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Error reading transactions, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Loaded {} transactions", transactions.len());
        TransactionLog { store, transactions }
    }

    pub fn append(&mut self, record: Transaction) -> Result<()> {
        self.transactions.insert(0, record);
        self.persist()
    }

    pub fn record_completed(
        &mut self,
        payment: CompletedPayment,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let record = Transaction {
            id: self.next_id(now),
            amount: payment.amount,
            phone_number: payment.phone_number,
            timestamp: now,
            status: TransactionStatus::Completed,
        };
        self.append(record.clone())?;
        info!("Recorded transaction {} for KSh {}", record.id, record.amount);
        Ok(record)
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    // TRX<millis>, bumped past the newest id when two land in the same millisecond
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        if let Some(newest) = self
            .transactions
            .first()
            .and_then(|tx| tx.id.strip_prefix("TRX"))
            .and_then(|n| n.parse::<i64>().ok())
        {
            if millis <= newest {
                millis = newest + 1;
            }
        }
        format!("TRX{}", millis)
    }

    fn persist(&self) -> Result<()> {
        if self.transactions.is_empty() {
            return Ok(());
        }
        let serialized = serde_json::to_string(&self.transactions)?;
        self.store.set(TRANSACTIONS_KEY, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::Amount;
    use crate::storage::file_store::FileStore;
    use crate::storage::memory_store::MemoryStore;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn payment(amount: &str, phone: Option<&str>) -> CompletedPayment {
        CompletedPayment {
            amount: Amount::parse(amount).unwrap(),
            phone_number: phone.map(str::to_string),
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn appends_newest_first() {
        let mut log = TransactionLog::load(Arc::new(MemoryStore::new()));
        log.record_completed(payment("50", None), at(1_000)).unwrap();
        log.record_completed(payment("150", Some("0712345678")), at(2_000)).unwrap();

        let ids: Vec<&str> = log.all().iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["TRX2000", "TRX1000"]);
        assert_eq!(log.all()[0].status, TransactionStatus::Completed);
        assert_eq!(log.all()[0].phone_number.as_deref(), Some("0712345678"));
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut log = TransactionLog::load(Arc::new(MemoryStore::new()));
        log.record_completed(payment("50", None), at(5_000)).unwrap();
        let second = log.record_completed(payment("60", None), at(5_000)).unwrap();
        assert_eq!(second.id, "TRX5001");
    }

    #[test]
    fn rehydrates_from_disk() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

        let mut log = TransactionLog::load(store.clone());
        log.record_completed(payment("100.50", Some("0712345678")), at(1_700_000_000_000))
            .unwrap();

        let reloaded = TransactionLog::load(store);
        assert_eq!(reloaded.all(), log.all());
        assert_eq!(reloaded.all()[0].timestamp, at(1_700_000_000_000));
    }

    #[test]
    fn corrupted_data_fails_closed() {
        let store = Arc::new(MemoryStore::new());
        store.set(TRANSACTIONS_KEY, "{not json").unwrap();

        let log = TransactionLog::load(store);
        assert!(log.all().is_empty());
    }

    #[test]
    fn empty_log_never_overwrites_stored_data() {
        let store = Arc::new(MemoryStore::new());
        store.set(TRANSACTIONS_KEY, "garbage").unwrap();

        let log = TransactionLog::load(store.clone());
        log.persist().unwrap();
        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("garbage"));
    }
}
